use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use streamcodec::{CodecConfig, CodecFormat, CodecRegistry, MessageHeader, Value};

mod trace;

#[derive(Debug, Parser, PartialEq)]
#[command(version, author, about)]
pub struct Args {
    #[clap(short = 'c', long = "config")]
    /// codec config file (toml or json); flags below are ignored when set
    config_path: Option<PathBuf>,

    #[clap(short = 'f', long, default_value = "json")]
    format: String,

    #[clap(long)]
    column: Option<String>,

    #[clap(long, help = "Emit every item of a top-level array as its own record")]
    split: bool,

    #[clap(short = 't', long, default_value = "events")]
    topic: String,

    #[clap(long = "header", value_parser = parse_header)]
    /// message header as key=value, may repeat
    headers: Vec<MessageHeader>,

    #[clap(long, help = "Payload is hex encoded")]
    hex: bool,

    #[clap(short = 'l', default_value = "info", long)]
    log_level: String,

    /// payload to decode
    payload: String,
}

fn parse_header(raw: &str) -> Result<MessageHeader, String> {
    match raw.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.as_bytes().to_vec())),
        None => Err(format!("expected key=value, got '{}'", raw)),
    }
}

impl Args {
    fn codec_config(&self) -> Result<CodecConfig> {
        if let Some(path) = &self.config_path {
            let path = path.to_string_lossy();
            return CodecConfig::load(&path).with_context(|| format!("loading codec config '{}'", path));
        }

        let config = CodecConfig {
            format: self.format.clone(),
            column_name: self.column.clone(),
            split_values: self.split,
            topic: Some(self.topic.clone()),
            ..CodecConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        if self.hex {
            return hex::decode(self.payload.trim()).context("payload is not valid hex");
        }
        Ok(self.payload.as_bytes().to_vec())
    }
}

fn render(value: &Value) -> String {
    match value.to_json() {
        Ok(json) => json.to_string(),
        Err(_) => format!("{:?}", value),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    trace::init_logging(&args.log_level)?;

    let config = args.codec_config()?;
    let format: CodecFormat = config.get_format()?;
    let topic = config.topic.clone().unwrap_or_else(|| args.topic.clone());

    let mut registry = CodecRegistry::new();
    registry.register_deserializer(topic.clone(), Arc::from(config.build_deserializer()?));
    registry.register_serializer(topic.clone(), Arc::from(config.build_serializer()?));
    info!("using {} codec for topic '{}'", format, topic);

    let headers = (!args.headers.is_empty()).then_some(args.headers.as_slice());
    let payload = args.payload()?;
    let records = registry.decode(&topic, headers, &payload)?;
    info!("decoded {} record(s) from {} byte(s)", records.len(), payload.len());

    for (i, record) in records.iter().enumerate() {
        println!("record[{}] = {}", i, render(record));

        // column-wrapped records are maps and only some formats can carry them back
        match registry.encode(&topic, headers, record) {
            Ok(bytes) => println!("  encoded = {}", hex::encode(bytes)),
            Err(err) => println!("  not re-encodable: {}", err),
        }
    }

    Ok(())
}
