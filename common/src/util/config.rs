use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parse: ParseConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub input: InputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parse: ParseConfig::default(),
            solver: SolverConfig::default(),
            input: InputConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    Strict,
    Lenient,
}

#[derive(Debug, Deserialize)]
pub struct ParseConfig {
    #[serde(default = "default_parse_mode")]
    pub mode: ParseMode,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            mode: default_parse_mode(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_cg_tolerance")]
    pub cg_tolerance: f64,
    #[serde(default = "default_cg_max_iterations_multiplier")]
    pub cg_max_iterations_multiplier: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            cg_tolerance: default_cg_tolerance(),
            cg_max_iterations_multiplier: default_cg_max_iterations_multiplier(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_design_dir")]
    pub design_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: Option<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            design_dir: default_design_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_parse_mode() -> ParseMode {
    ParseMode::Lenient
}

fn default_cg_tolerance() -> f64 {
    1e-6
}

fn default_cg_max_iterations_multiplier() -> usize {
    2
}

fn default_design_dir() -> String {
    "inputs/simple".to_string()
}

fn default_output_dir() -> Option<String> {
    None
}
