//! # Data Entries
//!
//! Script-style programs carry no constructor. They are configured by a
//! data transaction whose entries the script reads back:
//!
//! | Program  | Entries                                                   |
//! |----------|-----------------------------------------------------------|
//! | registry | `consuls_0`, `bft_coefficient`, `last_round`              |
//! | relay    | `gravity_contract`, `oracles`, `bft_coefficient`, `type`  |
//! | port     | `nebula_address`, `asset_id`, `type`                      |
//! | token    | `name`, `symbol`, `decimals`                              |
//!
//! Key lists are comma-separated hex SEC1 keys.

use super::errors::ProgramError;
use super::operations::ProgramInit;
use gw_01_oracle_consensus::{BftThreshold, ValidatorSet};
use shared_types::{DataType, OnchainId, PortDirection, ProgramKind};

/// Typed value of a data entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataValue {
    /// Integer entry
    Int(i64),
    /// String entry
    Str(String),
}

/// One key/value data entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataEntry {
    /// Entry key
    pub key: String,
    /// Entry value
    pub value: DataValue,
}

impl DataEntry {
    /// Integer entry.
    pub fn int(key: &str, value: i64) -> Self {
        Self {
            key: key.to_string(),
            value: DataValue::Int(value),
        }
    }

    /// String entry.
    pub fn string(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: DataValue::Str(value.into()),
        }
    }
}

impl ProgramInit {
    /// Encode as data entries.
    pub fn to_entries(&self) -> Vec<DataEntry> {
        match self {
            ProgramInit::Registry {
                consuls,
                bft,
                last_round,
            } => vec![
                DataEntry::string("consuls_0", consuls.to_hex().join(",")),
                DataEntry::int("bft_coefficient", bft.get() as i64),
                DataEntry::int("last_round", *last_round as i64),
            ],
            ProgramInit::Relay {
                registry,
                data_type,
                oracles,
                bft,
            } => vec![
                DataEntry::string("gravity_contract", registry.to_string()),
                DataEntry::string("oracles", oracles.to_hex().join(",")),
                DataEntry::int("bft_coefficient", bft.get() as i64),
                DataEntry::int("type", data_type.code()),
            ],
            ProgramInit::Port {
                direction,
                relay,
                token,
            } => vec![
                DataEntry::string("nebula_address", relay.to_string()),
                DataEntry::string("asset_id", token.to_string()),
                DataEntry::int("type", direction.code()),
            ],
            ProgramInit::Token {
                name,
                symbol,
                decimals,
            } => vec![
                DataEntry::string("name", name.clone()),
                DataEntry::string("symbol", symbol.clone()),
                DataEntry::int("decimals", i64::from(*decimals)),
            ],
        }
    }

    /// Decode the configuration of a `kind` program from its entries.
    pub fn from_entries(kind: ProgramKind, entries: &[DataEntry]) -> Result<Self, ProgramError> {
        let reader = EntryReader(entries);
        match kind {
            ProgramKind::Registry => {
                let consuls = reader.keys("consuls_0")?;
                let bft = reader.threshold("bft_coefficient", &consuls)?;
                let last_round = u64::try_from(reader.int("last_round")?)
                    .map_err(|_| invalid("last_round", "negative round"))?;
                Ok(ProgramInit::Registry {
                    consuls,
                    bft,
                    last_round,
                })
            }
            ProgramKind::Relay => {
                let oracles = reader.keys("oracles")?;
                let bft = reader.threshold("bft_coefficient", &oracles)?;
                let data_type =
                    DataType::from_code(reader.int("type")?).map_err(|e| invalid("type", e))?;
                Ok(ProgramInit::Relay {
                    registry: reader.id("gravity_contract")?,
                    data_type,
                    oracles,
                    bft,
                })
            }
            ProgramKind::Port => {
                let direction = PortDirection::from_code(reader.int("type")?)
                    .map_err(|e| invalid("type", e))?;
                Ok(ProgramInit::Port {
                    direction,
                    relay: reader.id("nebula_address")?,
                    token: reader.id("asset_id")?,
                })
            }
            ProgramKind::Token => {
                let decimals = u8::try_from(reader.int("decimals")?)
                    .map_err(|e| invalid("decimals", e))?;
                Ok(ProgramInit::Token {
                    name: reader.string("name")?.to_string(),
                    symbol: reader.string("symbol")?.to_string(),
                    decimals,
                })
            }
        }
    }
}

fn invalid(key: &str, reason: impl ToString) -> ProgramError {
    ProgramError::InvalidStorage {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

struct EntryReader<'a>(&'a [DataEntry]);

impl<'a> EntryReader<'a> {
    fn get(&self, key: &str) -> Result<&'a DataValue, ProgramError> {
        self.0
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| &e.value)
            .ok_or_else(|| invalid(key, "missing"))
    }

    fn int(&self, key: &str) -> Result<i64, ProgramError> {
        match self.get(key)? {
            DataValue::Int(v) => Ok(*v),
            _ => Err(invalid(key, "expected integer")),
        }
    }

    fn string(&self, key: &str) -> Result<&'a str, ProgramError> {
        match self.get(key)? {
            DataValue::Str(v) => Ok(v),
            _ => Err(invalid(key, "expected string")),
        }
    }

    fn id(&self, key: &str) -> Result<OnchainId, ProgramError> {
        self.string(key)?.parse().map_err(|e| invalid(key, e))
    }

    fn keys(&self, key: &str) -> Result<ValidatorSet, ProgramError> {
        let list: Vec<&str> = self
            .string(key)?
            .split(',')
            .filter(|k| !k.is_empty())
            .collect();
        ValidatorSet::from_hex(&list).map_err(|e| invalid(key, e))
    }

    fn threshold(
        &self,
        key: &str,
        set: &ValidatorSet,
    ) -> Result<BftThreshold, ProgramError> {
        let raw = usize::try_from(self.int(key)?).map_err(|e| invalid(key, e))?;
        set.threshold(raw).map_err(|e| invalid(key, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gw_01_oracle_consensus::OracleSigner;

    fn oracles(n: usize) -> ValidatorSet {
        ValidatorSet::new((0..n).map(|_| OracleSigner::random().validator_key()).collect())
            .unwrap()
    }

    #[test]
    fn test_relay_entries_decode() {
        let set = oracles(3);
        let init = ProgramInit::Relay {
            registry: OnchainId::new([4; 20]),
            data_type: DataType::Bytes,
            bft: set.threshold(2).unwrap(),
            oracles: set,
        };
        let entries = init.to_entries();
        assert!(entries.iter().any(|e| e.key == "gravity_contract"));
        assert_eq!(
            ProgramInit::from_entries(ProgramKind::Relay, &entries).unwrap(),
            init
        );
    }

    #[test]
    fn test_registry_round_read_back() {
        let set = oracles(4);
        let init = ProgramInit::Registry {
            bft: set.threshold(3).unwrap(),
            consuls: set,
            last_round: 4,
        };
        let mut entries = init.to_entries();
        assert_eq!(
            ProgramInit::from_entries(ProgramKind::Registry, &entries).unwrap(),
            init
        );

        entries.retain(|e| e.key != "last_round");
        entries.push(DataEntry::int("last_round", -1));
        assert!(matches!(
            ProgramInit::from_entries(ProgramKind::Registry, &entries),
            Err(ProgramError::InvalidStorage { ref key, .. }) if key == "last_round"
        ));
    }

    #[test]
    fn test_missing_entry_reported_by_key() {
        let entries = vec![DataEntry::string("name", "Wrapped")];
        let err = ProgramInit::from_entries(ProgramKind::Token, &entries).unwrap_err();
        assert_eq!(
            err,
            ProgramError::InvalidStorage {
                key: "symbol".into(),
                reason: "missing".into()
            }
        );
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let set = oracles(2);
        let entries = vec![
            DataEntry::string("consuls_0", set.to_hex().join(",")),
            DataEntry::int("bft_coefficient", 3),
        ];
        assert!(matches!(
            ProgramInit::from_entries(ProgramKind::Registry, &entries),
            Err(ProgramError::InvalidStorage { key, .. }) if key == "bft_coefficient"
        ));
    }

    #[test]
    fn test_wrong_entry_type() {
        let entries = vec![
            DataEntry::string("nebula_address", OnchainId::new([1; 20]).to_string()),
            DataEntry::string("asset_id", OnchainId::new([2; 20]).to_string()),
            DataEntry::string("type", "lock"),
        ];
        assert!(ProgramInit::from_entries(ProgramKind::Port, &entries).is_err());
    }
}
