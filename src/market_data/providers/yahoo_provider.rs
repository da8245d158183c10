use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use log::debug;
use reqwest::{header, Client};
use rust_decimal::Decimal;
use yahoo_finance_api as yahoo;
use yahoo_finance_api::YQuoteItem;

use crate::assets::assets_model::AssetType;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{
    DividendUpdate, FundamentalsUpdate, PriceBarUpdate, TickerSearchResult,
};

use super::market_data_provider::MarketDataProvider;
use super::models::{AssetProfile, PriceDetail, QuoteSummaryResult, YahooResult};

const HTTP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";

const QUOTE_SUMMARY_MODULES: &str =
    "price,summaryProfile,summaryDetail,defaultKeyStatistics,financialData";

#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

impl From<&YQuoteItem> for TickerSearchResult {
    fn from(item: &YQuoteItem) -> Self {
        TickerSearchResult {
            symbol: item.symbol.clone(),
            short_name: item.short_name.clone(),
            long_name: item.long_name.clone(),
            exchange: item.exchange.clone(),
            quote_type: item.quote_type.clone(),
            type_display: item.type_display.clone(),
            score: item.score,
        }
    }
}

/// Market data provider backed by the Yahoo Finance endpoints
pub struct YahooProvider {
    provider: yahoo::YahooConnector,
    client: Client,
    crumb: RwLock<Option<CrumbData>>,
}

impl YahooProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        let provider = yahoo::YahooConnector::new()?;
        Ok(Self {
            provider,
            client: Client::new(),
            crumb: RwLock::new(None),
        })
    }

    /// Returns the cached cookie/crumb pair, performing the handshake on
    /// first use
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        let cached = { self.crumb.read().unwrap().clone() };
        if let Some(crumb_data) = cached {
            return Ok(crumb_data);
        }

        let crumb_data = self.acquire_crumb().await?;

        let mut guard = self.crumb.write().unwrap();
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    async fn acquire_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // The first call only exists to obtain the session cookie
        let response = self.client.get("https://fc.yahoo.com").send().await?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|header| header.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(value, _)| value))
            .ok_or_else(|| {
                MarketDataError::ProviderError("Error parsing Yahoo crumb cookie".to_string())
            })?
            .to_string();

        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, HTTP_USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await?
            .text()
            .await?;

        if crumb.trim().is_empty() {
            return Err(MarketDataError::ProviderError(
                "Yahoo returned an empty crumb".to_string(),
            ));
        }

        Ok(CrumbData { cookie, crumb })
    }

    async fn fetch_quote_summary(&self, ticker: &str) -> Result<QuoteSummaryResult, MarketDataError> {
        let crumb_data = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules={}&crumb={}",
            ticker, QUOTE_SUMMARY_MODULES, crumb_data.crumb
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, HTTP_USER_AGENT)
            .header(header::COOKIE, &crumb_data.cookie)
            .send()
            .await?;

        let response_text = response.text().await?;

        let deserialized: YahooResult = serde_json::from_str(&response_text).map_err(|err| {
            MarketDataError::ParsingError(format!(
                "Failed to parse quote summary for {}: {}",
                ticker, err
            ))
        })?;

        deserialized
            .quote_summary
            .result
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::NotFound(format!("No quote summary data for {}", ticker)))
    }

    async fn quote_from_summary(&self, ticker: &str) -> Result<Decimal, MarketDataError> {
        let result = self.fetch_quote_summary(ticker).await?;

        result
            .price
            .as_ref()
            .and_then(|price| price.regular_market_price.as_ref())
            .and_then(|detail| detail.raw)
            .and_then(Decimal::from_f64_retain)
            .ok_or_else(|| MarketDataError::NotFound(format!("No market price for {}", ticker)))
    }

    /// Builds a profile from search results when the quote summary endpoint
    /// is unavailable
    async fn profile_from_search(&self, ticker: &str) -> Result<AssetProfile, MarketDataError> {
        let results = self.search(ticker).await?;

        results
            .into_iter()
            .find(|result| result.symbol == ticker)
            .map(|result| AssetProfile {
                ticker: result.symbol.clone(),
                name: Some(format_name(
                    Some(result.long_name.as_str()),
                    Some(result.short_name.as_str()),
                    &result.symbol,
                )),
                asset_type: parse_asset_type(&result.quote_type),
                currency: None,
                exchange: Some(result.exchange),
                sector: None,
                industry: None,
            })
            .ok_or_else(|| MarketDataError::NotFound(format!("No profile found for {}", ticker)))
    }

    fn period_start(period: &str) -> Result<SystemTime, MarketDataError> {
        let days: u64 = match period {
            "1mo" => 30,
            "3mo" => 91,
            "6mo" => 182,
            "1y" => 365,
            "2y" => 730,
            "5y" => 1825,
            "10y" => 3650,
            "max" => return Ok(SystemTime::UNIX_EPOCH),
            other => {
                return Err(MarketDataError::InvalidData(format!(
                    "Unsupported history period: {}",
                    other
                )))
            }
        };
        Ok(SystemTime::now() - Duration::from_secs(days * 86_400))
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn get_quote(&self, ticker: &str) -> Result<Decimal, MarketDataError> {
        match self.provider.get_latest_quotes(ticker, "1d").await {
            Ok(response) => {
                let quote = response.last_quote()?;
                Decimal::from_f64_retain(quote.close).ok_or_else(|| {
                    MarketDataError::ParsingError(format!("Invalid close price for {}", ticker))
                })
            }
            Err(err) => {
                debug!(
                    "Latest quote lookup failed for {}: {}, falling back to quote summary",
                    ticker, err
                );
                self.quote_from_summary(ticker).await
            }
        }
    }

    async fn get_profile(&self, ticker: &str) -> Result<AssetProfile, MarketDataError> {
        match self.fetch_quote_summary(ticker).await {
            Ok(result) => {
                let price = result.price.as_ref();

                let name = price.map(|p| {
                    format_name(p.long_name.as_deref(), p.short_name.as_deref(), &p.symbol)
                });
                let asset_type = parse_asset_type(price.map_or("", |p| p.quote_type.as_str()));
                let currency = price.and_then(|p| p.currency.clone());
                let exchange = price
                    .and_then(|p| p.exchange.clone().or_else(|| p.exchange_name.clone()));

                let (sector, industry) = result
                    .summary_profile
                    .as_ref()
                    .map(|profile| (profile.sector.clone(), profile.industry.clone()))
                    .unwrap_or((None, None));

                Ok(AssetProfile {
                    ticker: ticker.to_string(),
                    name,
                    asset_type,
                    currency,
                    exchange,
                    sector,
                    industry,
                })
            }
            Err(err) => {
                debug!(
                    "Failed to get full profile for {}: {}, trying search result",
                    ticker, err
                );
                self.profile_from_search(ticker).await
            }
        }
    }

    async fn get_history(
        &self,
        ticker: &str,
        period: &str,
    ) -> Result<Vec<PriceBarUpdate>, MarketDataError> {
        let start = Self::period_start(period)?;
        let end = SystemTime::now();

        let start_offset = start.into();
        let end_offset = end.into();

        let response = self
            .provider
            .get_quote_history(ticker, start_offset, end_offset)
            .await?;

        // One bar per calendar day; a repeated date keeps the later bar
        let mut bars: BTreeMap<NaiveDate, PriceBarUpdate> = BTreeMap::new();
        for quote in response.quotes()? {
            let date = match bar_date(quote.timestamp) {
                Some(date) => date,
                None => continue,
            };
            let close = match Decimal::from_f64_retain(quote.close) {
                Some(close) => close,
                None => continue,
            };

            bars.insert(
                date,
                PriceBarUpdate {
                    date,
                    open: Decimal::from_f64_retain(quote.open),
                    high: Decimal::from_f64_retain(quote.high),
                    low: Decimal::from_f64_retain(quote.low),
                    close,
                    volume: i64::try_from(quote.volume).ok(),
                },
            );
        }

        Ok(bars.into_values().collect())
    }

    async fn get_dividends(&self, ticker: &str) -> Result<Vec<DividendUpdate>, MarketDataError> {
        let start_offset = SystemTime::UNIX_EPOCH.into();
        let end_offset = SystemTime::now().into();

        let response = self
            .provider
            .get_quote_history(ticker, start_offset, end_offset)
            .await?;

        let mut events = Vec::new();
        for dividend in response.dividends()? {
            let ex_date = match bar_date(dividend.date) {
                Some(date) => date,
                None => continue,
            };
            let amount = match Decimal::from_f64_retain(dividend.amount) {
                Some(amount) if amount > Decimal::ZERO => amount,
                _ => continue,
            };

            events.push(DividendUpdate {
                ex_date,
                // The chart feed only reports ex-dates
                payment_date: None,
                amount,
            });
        }

        events.sort_by_key(|event| event.ex_date);
        Ok(events)
    }

    async fn get_fundamentals(
        &self,
        ticker: &str,
    ) -> Result<FundamentalsUpdate, MarketDataError> {
        let result = self.fetch_quote_summary(ticker).await?;

        let summary = result.summary_detail.unwrap_or_default();
        let statistics = result.default_key_statistics.unwrap_or_default();
        let financial = result.financial_data.unwrap_or_default();

        Ok(FundamentalsUpdate {
            pe_ratio: decimal_from_detail(&summary.trailing_pe),
            pb_ratio: decimal_from_detail(&statistics.price_to_book),
            dividend_yield: decimal_from_detail(&summary.dividend_yield),
            market_cap: decimal_from_detail(&summary.market_cap),
            eps: decimal_from_detail(&statistics.trailing_eps),
            revenue: decimal_from_detail(&financial.total_revenue),
            profit_margin: decimal_from_detail(&financial.profit_margins),
            debt_to_equity: decimal_from_detail(&financial.debt_to_equity),
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<TickerSearchResult>, MarketDataError> {
        let result = self.provider.search_ticker(query).await?;

        Ok(result.quotes.iter().map(TickerSearchResult::from).collect())
    }
}

fn bar_date(timestamp: i64) -> Option<NaiveDate> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|datetime| datetime.date_naive())
}

fn decimal_from_detail(detail: &Option<PriceDetail>) -> Option<Decimal> {
    detail
        .as_ref()
        .and_then(|d| d.raw)
        .and_then(Decimal::from_f64_retain)
}

fn parse_asset_type(quote_type: &str) -> AssetType {
    match quote_type.to_lowercase().as_str() {
        "equity" => AssetType::Stock,
        "etf" | "mutualfund" => AssetType::Etf,
        "bond" => AssetType::Bond,
        _ => AssetType::Other,
    }
}

fn format_name(long_name: Option<&str>, short_name: Option<&str>, symbol: &str) -> String {
    let name = long_name.unwrap_or("").replace("&amp;", "&");

    if name.is_empty() {
        return short_name.unwrap_or(symbol).to_string();
    }

    name
}
