use std::env;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use dotenvy::dotenv;
use tiffin_hub::domain::pricing::PricingConfig;
use tiffin_hub::{build_server, create_pool, run_migrations, AppState};

fn pricing_from_env() -> PricingConfig {
    let mut pricing = PricingConfig::default();
    if let Ok(rate) = env::var("TAX_RATE") {
        pricing.tax_rate = BigDecimal::from_str(&rate).expect("TAX_RATE must be a decimal");
    }
    if let Ok(fee) = env::var("DELIVERY_FEE") {
        pricing.delivery_fee = BigDecimal::from_str(&fee).expect("DELIVERY_FEE must be a decimal");
    }
    pricing
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");

    let pool = create_pool(&database_url);
    run_migrations(&pool);

    let state = AppState::postgres(pool, pricing_from_env());

    log::info!("Starting server at http://{}:{}", host, port);

    build_server(state, &host, port)?.await
}
