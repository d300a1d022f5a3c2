//! Service names for well-known TCP ports.
//!
//! The table is parsed from a `services(5)`-style text resource, one entry
//! per line: `name port/proto [aliases...] [# comment]`. A default resource
//! is compiled into the binary.

use crate::error::{ServiceError, ServiceResult};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// The services resource shipped with tcpsweep.
pub const BUNDLED_SERVICES: &str = include_str!("../assets/services");

/// Immutable mapping from TCP port to service name.
///
/// Built once and shared read-only between scan tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceTable {
    names: HashMap<u16, String>,
}

impl ServiceTable {
    /// Parse a table from resource text.
    ///
    /// Comment lines and lines with fewer than two fields are skipped, as are
    /// entries whose protocol does not end in `tcp`. A port field that does
    /// not parse is an error. When a port appears twice the first entry wins.
    pub fn parse(text: &str) -> ServiceResult<Self> {
        let mut names = HashMap::new();

        for (index, line) in text.lines().enumerate() {
            if line.starts_with('#') {
                continue;
            }

            let content = line.split('#').next().unwrap_or_default();
            let fields: Vec<&str> = content.split_whitespace().collect();
            if fields.len() < 2 {
                continue;
            }

            let (name, port_proto) = (fields[0], fields[1]);
            if !port_proto.ends_with("tcp") {
                continue;
            }

            let port_str = port_proto.split('/').next().unwrap_or_default();
            let port: u16 = port_str.parse().map_err(|source| ServiceError::InvalidPort {
                line: index + 1,
                value: port_str.to_string(),
                source,
            })?;

            if let Entry::Vacant(slot) = names.entry(port) {
                slot.insert(name.to_string());
            }
        }

        Ok(Self { names })
    }

    /// The table built from the bundled resource.
    pub fn bundled() -> ServiceResult<Self> {
        Self::parse(BUNDLED_SERVICES)
    }

    /// Read and parse a services file from disk.
    pub fn from_file(path: &Path) -> ServiceResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ServiceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Look up the service conventionally bound to `port`.
    pub fn get(&self, port: u16) -> Option<&str> {
        self.names.get(&port).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
