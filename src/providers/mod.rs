pub mod coinmarketcap;
pub mod openexchangerates;
pub mod util;

pub use coinmarketcap::CoinMarketCapProvider;
pub use openexchangerates::OpenExchangeRatesProvider;
