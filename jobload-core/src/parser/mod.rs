use crate::error::ParseError;
use crate::types::LoadDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct ParsedConfig {
    pub document: LoadDocument,
    pub format: ConfigFormat,
}

pub fn parse_config_str(input: &str, format: ConfigFormat) -> Result<ParsedConfig, ParseError> {
    match format {
        ConfigFormat::Json => Ok(ParsedConfig {
            document: serde_json::from_str::<LoadDocument>(input)?,
            format,
        }),
        ConfigFormat::Yaml => Ok(ParsedConfig {
            document: parse_yaml(input)?,
            format,
        }),
        ConfigFormat::Auto => parse_config_auto(input),
    }
}

fn parse_yaml(input: &str) -> Result<LoadDocument, ParseError> {
    // An empty YAML file is an empty document, so env-only runs can still point at one.
    if input.trim().is_empty() {
        return Ok(LoadDocument::default());
    }
    Ok(serde_yaml::from_str::<LoadDocument>(input)?)
}

fn parse_config_auto(input: &str) -> Result<ParsedConfig, ParseError> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') {
        return match serde_json::from_str::<LoadDocument>(input) {
            Ok(document) => Ok(ParsedConfig {
                document,
                format: ConfigFormat::Json,
            }),
            // JSON is a subset of YAML; report the JSON error for JSON-looking input.
            Err(e) => match parse_yaml(input) {
                Ok(document) => Ok(ParsedConfig {
                    document,
                    format: ConfigFormat::Yaml,
                }),
                Err(_) => Err(ParseError::Json(e)),
            },
        };
    }

    match parse_yaml(input) {
        Ok(document) => Ok(ParsedConfig {
            document,
            format: ConfigFormat::Yaml,
        }),
        Err(e) => {
            if let Ok(document) = serde_json::from_str::<LoadDocument>(input) {
                return Ok(ParsedConfig {
                    document,
                    format: ConfigFormat::Json,
                });
            }
            Err(e)
        }
    }
}
