use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// Cache TTLs in seconds, tuned per data volatility.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheTtlConfig {
    pub shopping_list: u64,
    pub meal_plan: u64,
    pub catalog_recipe: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// None means the cache layer runs in disabled (always-miss) mode.
    pub redis_url: Option<String>,
    pub jwt: JwtConfig,
    pub cache_ttl: CacheTtlConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let redis_url = std::env::var("REDIS_URL").ok().filter(|v| !v.is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mealplanner".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "mealplanner-users".into()),
        };
        let cache_ttl = CacheTtlConfig {
            shopping_list: std::env::var("CACHE_TTL_SHOPPING_LIST")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(300),
            meal_plan: std::env::var("CACHE_TTL_MEAL_PLAN")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(600),
            catalog_recipe: std::env::var("CACHE_TTL_CATALOG_RECIPE")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(3600),
        };
        Ok(Self {
            database_url,
            redis_url,
            jwt,
            cache_ttl,
        })
    }
}
