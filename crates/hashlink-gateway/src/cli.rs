use clap::{Parser, ValueEnum};
use hashlink_core::CollisionPolicy;
use hashlink_generator::digest::DEFAULT_TOKEN_LENGTH;
use hashlink_generator::HashAlgorithm;
use hashlink_shortener::DEFAULT_BASE_URL;
use hashlink_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "HASHLINK_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "HASHLINK_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "HASHLINK_STORAGE_BACKEND";
pub const DB_PATH_ENV: &str = "HASHLINK_DB_PATH";
pub const HASH_ALGORITHM_ENV: &str = "HASHLINK_HASH_ALGORITHM";
pub const TOKEN_LENGTH_ENV: &str = "HASHLINK_TOKEN_LENGTH";
pub const COLLISION_POLICY_ENV: &str = "HASHLINK_COLLISION_POLICY";
pub const LOG_FORMAT_ENV: &str = "HASHLINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_DB_PATH: &str = "url.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "json-file")]
    JsonFile,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::JsonFile => write!(f, "json-file"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HashAlgorithmArg {
    #[value(name = "sha256")]
    Sha256,
    #[value(name = "sha384")]
    Sha384,
    #[value(name = "sha512")]
    Sha512,
    #[value(name = "sha512_256")]
    Sha512_256,
}

impl From<HashAlgorithmArg> for HashAlgorithm {
    fn from(value: HashAlgorithmArg) -> Self {
        match value {
            HashAlgorithmArg::Sha256 => HashAlgorithm::Sha256,
            HashAlgorithmArg::Sha384 => HashAlgorithm::Sha384,
            HashAlgorithmArg::Sha512 => HashAlgorithm::Sha512,
            HashAlgorithmArg::Sha512_256 => HashAlgorithm::Sha512_256,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollisionPolicyArg {
    /// Store colliding tokens as-is.
    Ignore,
    /// Lengthen the token until it is unique.
    Lengthen,
}

impl From<CollisionPolicyArg> for CollisionPolicy {
    fn from(value: CollisionPolicyArg) -> Self {
        match value {
            CollisionPolicyArg::Ignore => CollisionPolicy::Ignore,
            CollisionPolicyArg::Lengthen => CollisionPolicy::Lengthen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "hashlink", about = "Content-addressed URL shortener")]
pub struct Cli {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Base URL short tokens are embedded into.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::JsonFile
    )]
    pub storage: StorageBackendArg,

    /// Store file used by the json-file backend.
    #[arg(long, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    #[arg(
        long,
        env = HASH_ALGORITHM_ENV,
        value_enum,
        default_value_t = HashAlgorithmArg::Sha256
    )]
    pub hash_algorithm: HashAlgorithmArg,

    #[arg(long, env = TOKEN_LENGTH_ENV, default_value_t = DEFAULT_TOKEN_LENGTH)]
    pub token_length: usize,

    #[arg(
        long,
        env = COLLISION_POLICY_ENV,
        value_enum,
        default_value_t = CollisionPolicyArg::Ignore
    )]
    pub collision_policy: CollisionPolicyArg,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,
}
