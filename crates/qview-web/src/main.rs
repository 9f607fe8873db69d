use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod config;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info,actix_web=debug")).init();

    // build pool from .env POSTGRES_URL
    let config = config::Config::from_env()?;
    let pool = config.pool()?;

    // create API documentation
    let openapi = api::ApiDoc::openapi();

    // run server
    info!("serving charts on http://{}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(pool.clone()))
            // api endpoints
            .configure(api::configure)
            // api documentation
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/openapi.json", openapi.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
