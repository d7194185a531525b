//! Application map data model.
//!
//! The map is produced by the discovery collaborator and handed to the sync
//! pipeline once per cycle. `BTreeMap` at both levels keeps iteration sorted
//! so equal input always renders byte-identical output.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// All known applications keyed by application id.
pub type ApplicationMap = BTreeMap<String, Application>;

/// A logical service with its exposed ports and running instances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Application {
    /// Exposed ports. Only the first one is used for the listener bind and
    /// for every backend server line.
    #[serde(default, alias = "Ports")]
    pub ports: Vec<u16>,

    /// Running instances keyed by instance id.
    #[serde(default, alias = "ApplicationInstances")]
    pub instances: BTreeMap<String, Instance>,
}

impl Application {
    pub fn new(ports: Vec<u16>) -> Self {
        Self {
            ports,
            instances: BTreeMap::new(),
        }
    }

    /// Builder-style helper used by discovery adapters and tests.
    pub fn with_instance(mut self, id: impl Into<String>, instance: Instance) -> Self {
        self.instances.insert(id.into(), instance);
        self
    }

    /// First declared port, if any.
    pub fn first_port(&self) -> Option<u16> {
        self.ports.first().copied()
    }

    /// Applications without ports cannot be load balanced.
    pub fn exposes_ports(&self) -> bool {
        !self.ports.is_empty()
    }
}

/// One running replica of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Instance {
    #[serde(alias = "Host")]
    pub host: String,

    /// Ports reported for this instance. Carried for completeness; backend
    /// lines always use the application's first port.
    #[serde(default, alias = "Ports")]
    pub ports: Vec<u16>,
}

impl Instance {
    pub fn new(host: impl Into<String>, ports: Vec<u16>) -> Self {
        Self {
            host: host.into(),
            ports,
        }
    }
}

/// Make an application id usable as an HAProxy section name.
///
/// Section names may not contain path separators, so every `/` becomes `_`.
pub fn sanitize_application_id(app_id: &str) -> String {
    app_id.replace('/', "_")
}

/// Number of applications that will produce a listener block.
pub fn listener_count(apps: &ApplicationMap) -> usize {
    apps.values().filter(|app| app.exposes_ports()).count()
}
