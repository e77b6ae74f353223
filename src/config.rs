use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    str::FromStr,
};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DRAFTS_PATH: &str = "data/drafts.json";

/// How editing an existing record interacts with the record store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditPolicy {
    /// The record leaves the store when editing starts and is appended again
    /// on save. Cancelling drops it.
    #[default]
    Reinsert,
    /// The record stays put until save replaces it; cancel changes nothing.
    InPlace,
}

impl FromStr for EditPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reinsert" => Ok(EditPolicy::Reinsert),
            "in_place" | "in-place" | "inplace" => Ok(EditPolicy::InPlace),
            other => Err(format!(
                "unknown edit policy '{other}', expected 'reinsert' or 'in_place'"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub drafts_path: PathBuf,
    pub edit_policy: EditPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let ip = match lookup("JOURNAL_BIND") {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|err| format!("invalid JOURNAL_BIND '{raw}': {err}"))?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let drafts_path = lookup("JOURNAL_DRAFTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DRAFTS_PATH));

        let edit_policy = match lookup("JOURNAL_EDIT_POLICY") {
            Some(raw) => raw.parse()?,
            None => EditPolicy::default(),
        };

        Ok(Self {
            addr: SocketAddr::new(ip, port),
            drafts_path,
            edit_policy,
        })
    }
}
