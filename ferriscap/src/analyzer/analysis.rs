//! Result types for a parsed capture.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Error;
use crate::model::Model;

/// One parsed capture.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The structured device record.
    pub model: Model,

    /// Per-category counts, mostly for logging.
    pub summary: Summary,

    /// Hostname, or the capture file stem when no hostname was found.
    pub display_name: String,

    /// The capture file this analysis came from.
    pub source: PathBuf,
}

impl Analysis {
    /// Wrap a finished model.
    pub fn new(model: Model, source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let display_name = display_name(&model, &source);
        let summary = Summary::of(&display_name, &model);
        Self {
            model,
            summary,
            display_name,
            source,
        }
    }

    /// Serialize the model as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.model)
    }
}

fn display_name(model: &Model, source: &Path) -> String {
    model
        .identity
        .hostname
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| {
            source
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "capture".to_string())
}

/// Counts per major model category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub name: String,
    pub interfaces: usize,
    pub vrfs: usize,
    pub bgp_peers: usize,
    pub configured_peers: usize,
    pub alarms: usize,
    pub static_routes: usize,
    pub raw_sections: usize,
    pub failed_sections: usize,
}

impl Summary {
    /// Count the categories of a model.
    pub fn of(name: &str, model: &Model) -> Self {
        let bgp = &model.protocols.bgp;
        Self {
            name: name.to_string(),
            interfaces: model.interfaces.len(),
            vrfs: model.protocols.vrfs.len(),
            bgp_peers: bgp.peers.len() + bgp.vpnv4_peers.len() + bgp.evpn_peers.len(),
            configured_peers: bgp.configured_peers.len(),
            alarms: model.alarms.len(),
            static_routes: model.routing.static_routes.len(),
            raw_sections: model.raw_sections.len(),
            failed_sections: model.raw_sections.failure_count(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} interfaces, {} VRFs, {} BGP peers ({} configured), {} alarms, \
             {} static routes, {} unparsed sections ({} failed)",
            self.name,
            self.interfaces,
            self.vrfs,
            self.bgp_peers,
            self.configured_peers,
            self.alarms,
            self.static_routes,
            self.raw_sections,
            self.failed_sections,
        )
    }
}

/// Outcome of a batch run: every target lands in exactly one list.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub successes: Vec<Analysis>,
    pub failures: Vec<(PathBuf, Error)>,
}

impl BatchReport {
    /// Total number of targets attempted.
    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Check if no target was attempted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if targets were attempted and all of them failed.
    pub fn all_failed(&self) -> bool {
        !self.failures.is_empty() && self.successes.is_empty()
    }
}
