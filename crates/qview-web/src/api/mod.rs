use actix_web::web;
use utoipa::OpenApi;

pub mod chart;

#[derive(OpenApi)]
#[openapi(paths(chart::candlestick, chart::line, chart::histogram))]
pub struct ApiDoc;

/// Register every chart endpoint on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(chart::candlestick)
        .service(chart::line)
        .service(chart::histogram);
}
