//! Fixed values shared across the crate: expected CSV column labels,
//! display units, defaults for the remote service and the bundled sample
//! dataset.

// =============================================================================
// CSV Column Labels
// =============================================================================

/// Header label for the equipment name column
pub const COLUMN_NAME: &str = "Equipment Name";

/// Header label for the equipment category column
pub const COLUMN_TYPE: &str = "Type";

/// Header label for the flowrate column
pub const COLUMN_FLOWRATE: &str = "Flowrate";

/// Header label for the pressure column
pub const COLUMN_PRESSURE: &str = "Pressure";

/// Header label for the temperature column
pub const COLUMN_TEMPERATURE: &str = "Temperature";

/// All labels an upload is expected to carry, in canonical order
pub const EXPECTED_COLUMNS: [&str; 5] = [
    COLUMN_NAME,
    COLUMN_TYPE,
    COLUMN_FLOWRATE,
    COLUMN_PRESSURE,
    COLUMN_TEMPERATURE,
];

// =============================================================================
// Units
// =============================================================================

pub const FLOWRATE_UNIT: &str = "m³/h";
pub const PRESSURE_UNIT: &str = "bar";
pub const TEMPERATURE_UNIT: &str = "K";

// =============================================================================
// Service Defaults
// =============================================================================

/// Base URL of the remote dataset service
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Per-request timeout for the remote service
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Number of uploads kept in history (local cache and remote listing alike)
pub const HISTORY_LIMIT: usize = 5;

/// Credentials accepted without a server when the remote service is unreachable
pub const DEMO_USERNAME: &str = "admin";
pub const DEMO_PASSWORD: &str = "admin123";

/// Environment overrides
pub const ENV_API_URL: &str = "CHEMVIZ_API_URL";
pub const ENV_STATE_DIR: &str = "CHEMVIZ_STATE_DIR";

/// Application directory name under the user data directory
pub const STATE_DIR_NAME: &str = "chemviz";

pub const SESSION_FILE: &str = "session.json";
pub const DEMO_HISTORY_FILE: &str = "demo_history.json";

// =============================================================================
// Sample Data
// =============================================================================

pub const SAMPLE_FILE_NAME: &str = "sample_equipment_data.csv";

/// Ten-row sample dataset covering five equipment categories
pub const SAMPLE_CSV: &str = "Equipment Name,Type,Flowrate,Pressure,Temperature
Pump A,Pump,120,8.5,320
Pump B,Pump,135,9.0,330
Reactor 1,Reactor,200,15.0,450
Reactor 2,Reactor,210,14.5,460
Heat Exchanger 1,Heat Exchanger,180,12.0,400
Heat Exchanger 2,Heat Exchanger,175,11.8,395
Compressor A,Compressor,160,10.5,360
Compressor B,Compressor,165,10.8,365
Mixer 1,Mixer,90,5.0,280
Mixer 2,Mixer,95,5.2,285";
