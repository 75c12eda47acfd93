use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use utoipa::ToSchema;

/// Cloud storage provider tags
///
/// The serialized form is the tag the file helper expects (`AZURE`, `AWS`,
/// `GC`, `LOCAL`) and the one echoed back in presigned URL results.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum CloudProvider {
    Azure,
    Aws,
    #[serde(rename = "GC")]
    Gc,
    Local,
}

impl CloudProvider {
    /// All provider tags, in mount order.
    pub const ALL: [CloudProvider; 4] = [
        CloudProvider::Azure,
        CloudProvider::Aws,
        CloudProvider::Gc,
        CloudProvider::Local,
    ];

    /// Path segment used under `/cloud-services/`.
    pub fn route_segment(&self) -> &'static str {
        match self {
            CloudProvider::Azure => "azure",
            CloudProvider::Aws => "aws",
            CloudProvider::Gc => "gcp",
            CloudProvider::Local => "local",
        }
    }
}

impl FromStr for CloudProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "azure" => Ok(CloudProvider::Azure),
            "aws" | "s3" => Ok(CloudProvider::Aws),
            "gc" | "gcp" | "gcs" => Ok(CloudProvider::Gc),
            "local" => Ok(CloudProvider::Local),
            _ => Err(anyhow::anyhow!("Invalid cloud storage provider: {}", s)),
        }
    }
}

impl Display for CloudProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CloudProvider::Azure => write!(f, "AZURE"),
            CloudProvider::Aws => write!(f, "AWS"),
            CloudProvider::Gc => write!(f, "GC"),
            CloudProvider::Local => write!(f, "LOCAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("AZURE".parse::<CloudProvider>().unwrap(), CloudProvider::Azure);
        assert_eq!("gcs".parse::<CloudProvider>().unwrap(), CloudProvider::Gc);
        assert_eq!(" s3 ".parse::<CloudProvider>().unwrap(), CloudProvider::Aws);
        assert!("dropbox".parse::<CloudProvider>().is_err());
    }

    #[test]
    fn test_serialized_tag_matches_display() {
        for provider in CloudProvider::ALL {
            let json = serde_json::to_value(provider).unwrap();
            assert_eq!(json, serde_json::Value::String(provider.to_string()));
        }
    }
}
