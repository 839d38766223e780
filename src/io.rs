//! I/O 支持：快照与网结构的 JSON、RON 序列化接口。
use ron::ser::PrettyConfig;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ron error: {0}")]
    Ron(#[from] ron::Error),
    #[error("ron parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),
}

/// Output encodings understood by the renderer feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Ron,
}

impl Format {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(Format::Json),
            "ron" => Some(Format::Ron),
            _ => None,
        }
    }

    pub fn render<T: Serialize>(self, value: &T) -> Result<String, IoError> {
        match self {
            Format::Json => to_json_string(value),
            Format::Ron => to_ron_string(value),
        }
    }
}

pub fn to_json_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_json_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(s)?)
}

pub fn to_ron_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    let pretty = PrettyConfig::default().new_line("\n".to_string());
    Ok(ron::ser::to_string_pretty(value, pretty)?)
}

pub fn from_ron_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(ron::from_str(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{FlowSession, FlowSnapshot, catalog};
    use crate::probe::{LinearTable, ProbeTable};

    #[test]
    fn flow_snapshot_serializes_places_by_name() {
        let mut session = FlowSession::new(catalog::load("coffee").unwrap());
        session.fire("heatWater").unwrap();
        let json = to_json_string(&session.snapshot()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["marking"]["waterHot"], 1);
        assert_eq!(value["status"], "running");
        assert_eq!(value["fired"][0], "heatWater");

        let back: FlowSnapshot = from_json_str(&json).unwrap();
        assert_eq!(back, session.snapshot());
    }

    #[test]
    fn tables_survive_json_and_ron() {
        let (table, _) = LinearTable::new(5).unwrap().insert("maya5").unwrap();
        let json = Format::Json.render(&table).unwrap();
        assert_eq!(from_json_str::<LinearTable>(&json).unwrap(), table);

        let ron = Format::Ron.render(&table).unwrap();
        assert_eq!(from_ron_str::<LinearTable>(&ron).unwrap(), table);
        assert!(from_ron_str::<LinearTable>("(slots: [").is_err());
    }

    #[test]
    fn format_names() {
        assert_eq!(Format::from_name("ron"), Some(Format::Ron));
        assert_eq!(Format::from_name("yaml"), None);
    }
}
