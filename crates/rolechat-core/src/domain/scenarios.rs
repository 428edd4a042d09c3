//! Built-in roleplay scenario templates.

/// A ready-made roleplay scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    Starbucks,
    Cafe,
    Hotel,
}

impl Scenario {
    pub const ALL: [Self; 3] = [Self::Starbucks, Self::Cafe, Self::Hotel];

    /// Parse a scenario from its short name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starbucks" => Some(Self::Starbucks),
            "cafe" => Some(Self::Cafe),
            "hotel" => Some(Self::Hotel),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Starbucks => "starbucks",
            Self::Cafe => "cafe",
            Self::Hotel => "hotel",
        }
    }

    /// Default assistant persona for the scenario.
    #[must_use]
    pub const fn gpt_role(&self) -> &'static str {
        match self {
            Self::Starbucks => "a friendly Starbucks barista",
            Self::Cafe => "a barista at a coffee shop",
            Self::Hotel => "a hotel receptionist",
        }
    }

    /// Default learner persona for the scenario.
    #[must_use]
    pub const fn user_role(&self) -> &'static str {
        match self {
            Self::Starbucks | Self::Cafe => "a customer ordering drinks",
            Self::Hotel => "a guest checking in",
        }
    }

    /// The role template interpolated into the roleplay system prompt.
    #[must_use]
    pub const fn template(&self) -> &'static str {
        match self {
            Self::Starbucks => STARBUCKS_TEMPLATE,
            Self::Cafe => CAFE_STAFF_TEMPLATE,
            Self::Hotel => HOTEL_RECEPTIONIST_TEMPLATE,
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const STARBUCKS_TEMPLATE: &str = "You are a friendly barista at Starbucks.
You help customers order coffee and provide recommendations.

Menu:
- Coffee: Americano, Latte, Cappuccino
- Sizes: Tall, Grande, Venti
- Customizations: Different milk options, syrups

Be friendly and helpful in your responses.";

const CAFE_STAFF_TEMPLATE: &str = "You are a barista at a coffee shop.
Help customers order drinks and food.

Menu:
- Coffee: Americano, Latte, Cappuccino
- Tea: Green tea, Black tea
- Pastries: Croissant, Muffin

Be friendly and patient.";

const HOTEL_RECEPTIONIST_TEMPLATE: &str = "You are a hotel receptionist.
Help guests with check-in/check-out and answer questions.

Services:
- Room service
- Breakfast (6:30-10:00 AM)
- Concierge

Be professional and helpful.";
