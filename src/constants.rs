// Default curve economics
pub const DEFAULT_INITIAL_PRICE: f64 = 0.01; // SOL per token at zero supply
pub const DEFAULT_LINEAR_SLOPE: f64 = 0.0001; // price increase per token sold
pub const DEFAULT_GROWTH_RATE: f64 = 1.0001; // per-token multiplicative growth
pub const DEFAULT_LOG_COEFFICIENT: f64 = 0.01; // scales ln(supply + 1)
pub const DEFAULT_INITIAL_SUPPLY: f64 = 1_000_000.0;

// Launch validation bounds
pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 8;
pub const MIN_INITIAL_PRICE: f64 = 0.00001; // 0.00001 SOL floor
pub const MAX_INITIAL_PRICE: f64 = 10.0;
pub const MAX_GROWTH_RATE: f64 = 1.1; // 10% per token
pub const MIN_INITIAL_SUPPLY: f64 = 1.0;
pub const MAX_INITIAL_SUPPLY: f64 = 100_000_000_000.0; // 100B tokens

// Fee constants
pub const DEFAULT_CREATOR_FEE_RATE: f64 = 0.025; // 2.5% creator fee
pub const DEFAULT_PLATFORM_FEE_RATE: f64 = 0.025; // 2.5% platform fee
pub const MAX_TOTAL_FEE_RATE: f64 = 0.10; // 10% cap across creator + platform
pub const DEFAULT_TREASURY_MINT_RATE: f64 = 0.01; // share of initial mint routed to treasury

// Market thresholds
pub const DEFAULT_BONDING_CURVE_LIMIT: f64 = 50_000.0; // market cap where curve pricing retires
pub const DEFAULT_DEXSCREENER_THRESHOLD: f64 = 50_000.0; // market cap for DEX screener listing
pub const DEFAULT_REWARD_CLAIM_PERIOD_DAYS: i64 = 5; // days between creator reward claims
