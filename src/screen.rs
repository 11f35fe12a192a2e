pub mod viewer;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    #[error("Please enter a stock symbol.")]
    EmptySymbol,
    #[error("No API key configured. Set `STOCK_API_KEY` or edit `config.properties`.")]
    MissingApiKey,
    #[error("{0}")]
    Fetch(String),
    #[error("Failed to parse data for {symbol}. Raw response: {excerpt}")]
    Parse { symbol: String, excerpt: String },
}
