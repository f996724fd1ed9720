use rand::Rng;

/// Adjectives used for referral codes. Alphabetic only.
const ADJECTIVES: &[&str] = &[
    "Able", "Agile", "Amber", "Ample", "Ancient", "Arctic", "Azure", "Bold",
    "Brave", "Breezy", "Bright", "Brisk", "Calm", "Candid", "Careful", "Cheerful",
    "Clever", "Cosmic", "Crisp", "Curious", "Daring", "Dazzling", "Eager", "Early",
    "Earnest", "Electric", "Elegant", "Epic", "Fair", "Famous", "Fearless", "Fierce",
    "Fluffy", "Fond", "Frank", "Free", "Fresh", "Friendly", "Gentle", "Giant",
    "Gifted", "Glad", "Golden", "Graceful", "Grand", "Happy", "Hardy", "Harmonic",
    "Hearty", "Honest", "Humble", "Icy", "Ideal", "Jolly", "Joyful", "Keen",
    "Kind", "Large", "Lively", "Loyal", "Lucky", "Lunar", "Magic", "Majestic",
    "Mellow", "Merry", "Mighty", "Modest", "Neat", "Nimble", "Noble", "Novel",
    "Ocean", "Optimal", "Patient", "Peaceful", "Plucky", "Polite", "Proud", "Quick",
    "Quiet", "Radiant", "Rapid", "Rare", "Ready", "Regal", "Robust", "Royal",
    "Rustic", "Sharp", "Shiny", "Silent", "Silver", "Simple", "Smart", "Smooth",
    "Snowy", "Solar", "Solid", "Sparkling", "Speedy", "Spicy", "Splendid", "Steady",
    "Stellar", "Sturdy", "Sunny", "Super", "Swift", "Tender", "Tidy", "Tranquil",
    "Trusty", "Upbeat", "Valiant", "Vast", "Vivid", "Warm", "Wise", "Witty",
    "Young", "Zany", "Zealous", "Zesty",
];

const MIN_SUFFIX: u16 = 100;
const MAX_SUFFIX: u16 = 999;

/// Source of fresh referral codes
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AdjectiveCodeGenerator;

impl CodeGenerator for AdjectiveCodeGenerator {
    fn generate(&self) -> String {
        generate_referral_code()
    }
}

/// `<Adjective><100..=999>` with no separator, e.g. `Brave123`
pub fn generate_referral_code() -> String {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let suffix = rng.random_range(MIN_SUFFIX..=MAX_SUFFIX);
    format!("{}{}", adjective, suffix)
}
