//! Host detection for machine-readable reports.

use serde::{Deserialize, Serialize};

/// Host information recorded alongside a run, so timings can be compared
/// across machines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_cores_logical: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_cores_physical: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_ram_bytes: Option<u64>,

    pub os: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        EnvironmentInfo {
            cpu_model: None,
            cpu_cores_logical: None,
            cpu_cores_physical: None,
            total_ram_bytes: None,
            os: std::env::consts::OS.to_string(),
            hostname: None,
        }
    }
}

impl EnvironmentInfo {
    /// Detect environment information from the current system
    pub fn detect() -> Self {
        use sysinfo::System;

        let mut sys = System::new_all();
        sys.refresh_all();

        let cpu_model = sys
            .cpus()
            .first()
            .map(|c| c.brand().trim().to_string())
            .filter(|s| !s.is_empty());
        let cpu_cores_logical = Some(sys.cpus().len()).filter(|n| *n > 0);
        let cpu_cores_physical = sys.physical_core_count();
        let total_ram_bytes = Some(sys.total_memory());
        let os = System::name().unwrap_or_else(|| std::env::consts::OS.to_string());
        let hostname = System::host_name();

        EnvironmentInfo {
            cpu_model,
            cpu_cores_logical,
            cpu_cores_physical,
            total_ram_bytes,
            os,
            hostname,
        }
    }
}
