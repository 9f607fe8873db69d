use actix_web::{get, web, HttpResponse, Responder};
use deadpool_postgres::{Client, Pool};
use log::{debug, error};
use qview_chart::{
    filter_by_period, format_candlestick_data, format_histogram_data, format_line_data, Candle,
    HistogramBar, LineField, LinePoint, Period, RawNumber, TimeSeriesPoint,
};
use serde::Deserialize;
use tokio_postgres::Row;

pub static CHART_QUERY: &str = "
    SELECT
        dated::VARCHAR,
        opening,
        high,
        low,
        closing,
        trend_q,
        fq,
        qv1
    FROM q.indices WHERE ticker = $1";

/// `?period=3m|6m|1y|5y`; missing or unknown means `3m`.
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    #[serde(default)]
    pub period: Period,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Candlestick series per stock ticker symbol
///
/// ```json
/// [
///     {
///         "time": 1704067200,
///         "open": 185.2,
///         "high": 188.4,
///         "low": 183.9,
///         "close": 187.1
///     },
///     // ...
/// ]
/// ```
#[utoipa::path(
    get,
    path = "/chart/{ticker}/candlestick",
    responses(
        (
            status = 200, description = "OHLC candles inside the requested window, oldest first",
            body = [Candle], content_type = "application/json",
            example = json!([
                {
                    "time": 1704067200,
                    "open": 185.2,
                    "high": 188.4,
                    "low": 183.9,
                    "close": 187.1
                }
            ])
        ),
        (status = 500, description = "Query execution failed")
    ),
    params(
        ("ticker" = String, Path, description = "Stock ticker symbol"),
        ("period" = Option<String>, Query, description = "Look-back window: 3m, 6m, 1y or 5y (default 3m)")
    )
)]
#[get("chart/{ticker}/candlestick")]
pub async fn candlestick(
    path: web::Path<String>,
    query: web::Query<WindowQuery>,
    db_pool: web::Data<Pool>,
) -> impl Responder {
    let ticker = path.into_inner();
    match load_window(&db_pool, &ticker, query.period).await {
        Ok(points) => HttpResponse::Ok().json(format_candlestick_data(&points)),
        Err(e) => query_failed(&ticker, e),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Indicator line per stock ticker symbol
///
/// ```json
/// [
///     {
///         "time": 1704067200,
///         "value": -0.42
///     },
///     // ...
/// ]
/// ```
#[utoipa::path(
    get,
    path = "/chart/{ticker}/line/{field}",
    responses(
        (
            status = 200, description = "One Q-index indicator as a line, oldest first",
            body = [LinePoint], content_type = "application/json",
            example = json!([
                {
                    "time": 1704067200,
                    "value": -0.42
                }
            ])
        ),
        (status = 400, description = "Field is not one of trend_q, fq"),
        (status = 500, description = "Query execution failed")
    ),
    params(
        ("ticker" = String, Path, description = "Stock ticker symbol"),
        ("field" = String, Path, description = "Indicator to plot: trend_q or fq"),
        ("period" = Option<String>, Query, description = "Look-back window: 3m, 6m, 1y or 5y (default 3m)")
    )
)]
#[get("chart/{ticker}/line/{field}")]
pub async fn line(
    path: web::Path<(String, String)>,
    query: web::Query<WindowQuery>,
    db_pool: web::Data<Pool>,
) -> impl Responder {
    let (ticker, field) = path.into_inner();
    let field: LineField = match field.parse() {
        Ok(field) => field,
        Err(e) => {
            debug!("[{ticker}] rejected line request: {e}");
            return HttpResponse::BadRequest().body(e.to_string());
        }
    };

    match load_window(&db_pool, &ticker, query.period).await {
        Ok(points) => HttpResponse::Ok().json(format_line_data(&points, field)),
        Err(e) => query_failed(&ticker, e),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// `qv1` histogram per stock ticker symbol
///
/// ```json
/// [
///     {
///         "time": 1704067200,
///         "value": -5.0,
///         "color": "#ef5350"
///     },
///     // ...
/// ]
/// ```
#[utoipa::path(
    get,
    path = "/chart/{ticker}/histogram",
    responses(
        (
            status = 200, description = "qv1 bars, green at or above zero and red below, oldest first",
            body = [HistogramBar], content_type = "application/json",
            example = json!([
                {
                    "time": 1704067200,
                    "value": -5.0,
                    "color": "#ef5350"
                }
            ])
        ),
        (status = 500, description = "Query execution failed")
    ),
    params(
        ("ticker" = String, Path, description = "Stock ticker symbol"),
        ("period" = Option<String>, Query, description = "Look-back window: 3m, 6m, 1y or 5y (default 3m)")
    )
)]
#[get("chart/{ticker}/histogram")]
pub async fn histogram(
    path: web::Path<String>,
    query: web::Query<WindowQuery>,
    db_pool: web::Data<Pool>,
) -> impl Responder {
    let ticker = path.into_inner();
    match load_window(&db_pool, &ticker, query.period).await {
        Ok(points) => HttpResponse::Ok().json(format_histogram_data(&points)),
        Err(e) => query_failed(&ticker, e),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Database
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

async fn load_window(
    db_pool: &Pool,
    ticker: &str,
    period: Period,
) -> anyhow::Result<Vec<TimeSeriesPoint>> {
    // establish connection from pool
    let conn: Client = db_pool.get().await?;

    // query the database
    let rows = conn.query(CHART_QUERY, &[&ticker]).await?;
    let points = rows
        .iter()
        .map(point_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    let window = filter_by_period(&points, period);
    debug!(
        "[{ticker}] {} of {} rows inside the {period} window",
        window.len(),
        points.len()
    );
    Ok(window)
}

fn point_from_row(row: &Row) -> Result<TimeSeriesPoint, tokio_postgres::Error> {
    let number = |column: &str| -> Result<Option<RawNumber>, tokio_postgres::Error> {
        Ok(row.try_get::<_, Option<f64>>(column)?.map(RawNumber::Number))
    };

    Ok(TimeSeriesPoint {
        date: row.try_get("dated")?,
        open: number("opening")?,
        high: number("high")?,
        low: number("low")?,
        close: number("closing")?,
        trend_q: number("trend_q")?,
        fq: number("fq")?,
        qv1: number("qv1")?,
    })
}

fn query_failed(ticker: &str, e: anyhow::Error) -> HttpResponse {
    error!("[{ticker}] chart query failed: {e}");
    HttpResponse::InternalServerError().body("Query execution failed")
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
