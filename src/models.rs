use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "CE",
            OptionType::Put => "PE",
        }
    }
}

/// One validated leg of an option chain: a call or a put at one strike.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChainEntry {
    pub strike_price: f64,
    pub option_type: OptionType,
    pub open_interest: f64,
    pub change_in_oi: f64,
    /// Same value on every entry of a symbol, when the exchange reports it.
    pub underlying_price: Option<f64>,
}

impl RawChainEntry {
    pub fn call(strike_price: f64, open_interest: f64, change_in_oi: f64) -> Self {
        Self {
            strike_price,
            option_type: OptionType::Call,
            open_interest,
            change_in_oi,
            underlying_price: None,
        }
    }

    pub fn put(strike_price: f64, open_interest: f64, change_in_oi: f64) -> Self {
        Self {
            strike_price,
            option_type: OptionType::Put,
            open_interest,
            change_in_oi,
            underlying_price: None,
        }
    }

    pub fn with_underlying(mut self, underlying_price: f64) -> Self {
        self.underlying_price = Some(underlying_price);
        self
    }
}

/// Per-symbol output of the analyzer. Field names match the published JSON
/// and CSV columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolResult {
    #[serde(rename = "Symbol")]
    pub symbol: String,

    #[serde(rename = "Underlying_Value")]
    pub underlying_value: f64,

    #[serde(rename = "Sum_CE_OI")]
    pub sum_ce_oi: i64,

    #[serde(rename = "Sum_PE_OI")]
    pub sum_pe_oi: i64,

    #[serde(rename = "Sum_CE_Change_OI")]
    pub sum_ce_change_oi: i64,

    #[serde(rename = "Sum_PE_Change_OI")]
    pub sum_pe_change_oi: i64,

    /// (PE OI - CE OI) / MIN(PE OI, CE OI); positive means put-heavy.
    #[serde(rename = "Combined_OI")]
    pub combined_oi: f64,

    /// (PE OI change - CE OI change) / (PE OI + CE OI); positive means puts
    /// are building faster than calls.
    #[serde(rename = "Combined_CH_OI")]
    pub combined_ch_oi: f64,
}
