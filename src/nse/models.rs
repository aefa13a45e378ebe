use crate::error::ParseError;
use crate::models::{OptionType, RawChainEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractInfo {
    #[serde(rename = "expiryDates", default)]
    pub expiry_dates: Vec<String>,
}

/// Response of the option-chain-v3 endpoint. The exchange has shipped rows
/// both under `records` and at the top level, so both are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionChain {
    #[serde(default)]
    pub records: Option<Records>,

    #[serde(default)]
    pub data: Option<Vec<OptionData>>,

    #[serde(rename = "underlyingValue", default)]
    pub underlying_value: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Records {
    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(rename = "underlyingValue", default)]
    pub underlying_value: Option<f64>,

    #[serde(default)]
    pub data: Vec<OptionData>,
}

/// Option data for each strike price
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionData {
    #[serde(rename = "strikePrice", default)]
    pub strike_price: Option<f64>,

    #[serde(rename = "CE", default)]
    pub call: Option<OptionDetail>,

    #[serde(rename = "PE", default)]
    pub put: Option<OptionDetail>,
}

/// One CE or PE leg as sent by the exchange
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionDetail {
    #[serde(rename = "underlyingValue", default)]
    pub underlying_value: Option<f64>,

    #[serde(rename = "openInterest", default)]
    pub open_interest: Option<f64>,

    #[serde(rename = "changeinOpenInterest", default)]
    pub change_in_oi: Option<f64>,
}

impl OptionChain {
    fn rows(&self) -> &[OptionData] {
        match &self.records {
            Some(records) if !records.data.is_empty() => &records.data,
            _ => self.data.as_deref().unwrap_or(&[]),
        }
    }

    /// Underlying price: records, then top level, then the first CE leg,
    /// then the first PE leg.
    pub fn underlying_value(&self) -> Option<f64> {
        let from_records = self.records.as_ref().and_then(|r| r.underlying_value);
        let rows = self.rows();

        from_records
            .or(self.underlying_value)
            .or_else(|| {
                rows.first()
                    .and_then(|r| r.call.as_ref())
                    .and_then(|leg| leg.underlying_value)
                    .filter(|v| *v != 0.0)
            })
            .or_else(|| {
                rows.first()
                    .and_then(|r| r.put.as_ref())
                    .and_then(|leg| leg.underlying_value)
                    .filter(|v| *v != 0.0)
            })
    }

    /// Validate the payload into typed entries, one per present leg.
    pub fn into_entries(self) -> Result<Vec<RawChainEntry>, ParseError> {
        let underlying = match self.underlying_value() {
            Some(v) if !v.is_finite() || v <= 0.0 => return Err(ParseError::InvalidUnderlying(v)),
            other => other,
        };

        let rows = self.rows();
        let mut entries = Vec::with_capacity(rows.len() * 2);

        for (row, data) in rows.iter().enumerate() {
            let strike = data.strike_price.ok_or(ParseError::MissingStrike { row })?;
            if !strike.is_finite() || strike <= 0.0 {
                return Err(ParseError::InvalidStrike { row, strike });
            }

            let legs = [(OptionType::Call, &data.call), (OptionType::Put, &data.put)];
            for (option_type, leg) in legs {
                if let Some(leg) = leg {
                    entries.push(parse_leg(row, strike, option_type, leg, underlying)?);
                }
            }
        }

        Ok(entries)
    }
}

fn parse_leg(
    row: usize,
    strike: f64,
    option_type: OptionType,
    leg: &OptionDetail,
    underlying: Option<f64>,
) -> Result<RawChainEntry, ParseError> {
    let name = option_type.as_str();

    // Untraded legs come without OI fields
    let open_interest = leg.open_interest.unwrap_or(0.0);
    if !open_interest.is_finite() || open_interest < 0.0 {
        return Err(ParseError::InvalidOpenInterest { row, leg: name, value: open_interest });
    }

    let change_in_oi = leg.change_in_oi.unwrap_or(0.0);
    if !change_in_oi.is_finite() {
        return Err(ParseError::InvalidChangeInOpenInterest { row, leg: name, value: change_in_oi });
    }

    Ok(RawChainEntry {
        strike_price: strike,
        option_type,
        open_interest,
        change_in_oi,
        underlying_price: underlying,
    })
}
