use std::env;
use std::sync::OnceLock;

/// Argon2 cost parameters. The defaults match the argon2 crate's
/// recommended profile; tests use [`HashCost::fast`] so suites stay quick.
#[derive(Clone, Debug)]
pub struct HashCost {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl HashCost {
    pub fn standard() -> Self {
        HashCost {
            m_cost: 19_456,
            t_cost: 2,
            p_cost: 1,
        }
    }

    /// Minimum-cost profile. Test configuration only; digests produced with
    /// it still verify anywhere because the PHC string carries its params.
    pub fn fast() -> Self {
        HashCost {
            m_cost: 8,
            t_cost: 1,
            p_cost: 1,
        }
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub db_url: String,
    pub hash: HashCost,
}

impl EnvConfig {
    fn get_env(key: &str) -> String {
        env::var(key).unwrap_or_else(|_| panic!("Environment variable {} not set", key))
    }

    fn get_env_or(key: &str, default: u32) -> u32 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = HashCost::standard();

        EnvConfig {
            db_url: Self::get_env("POSTGRES_URI"),
            hash: HashCost {
                m_cost: Self::get_env_or("ARGON2_M_COST", defaults.m_cost),
                t_cost: Self::get_env_or("ARGON2_T_COST", defaults.t_cost),
                p_cost: Self::get_env_or("ARGON2_P_COST", defaults.p_cost),
            },
        }
    }
}

pub static CONFIG: OnceLock<EnvConfig> = OnceLock::new();

#[allow(dead_code)]
pub fn config() -> &'static EnvConfig {
    CONFIG.get().expect("Not initialized")
}
