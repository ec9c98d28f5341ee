use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Voice the rewritten copy should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    Professional,
    Friendly,
    Confident,
    Casual,
    Authoritative,
    Empathetic,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Professional,
        Tone::Friendly,
        Tone::Confident,
        Tone::Casual,
        Tone::Authoritative,
        Tone::Empathetic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Confident => "confident",
            Tone::Casual => "casual",
            Tone::Authoritative => "authoritative",
            Tone::Empathetic => "empathetic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tone::Professional => "Professional - Formal & Business-like",
            Tone::Friendly => "Friendly - Warm & Approachable",
            Tone::Confident => "Confident - Bold & Authoritative",
            Tone::Casual => "Casual - Relaxed & Conversational",
            Tone::Authoritative => "Authoritative - Expert & Commanding",
            Tone::Empathetic => "Empathetic - Understanding & Supportive",
        }
    }

    /// Phrase spliced into the rewrite instruction.
    pub fn description(self) -> &'static str {
        match self {
            Tone::Professional => "formal and business-like",
            Tone::Friendly => "warm and approachable",
            Tone::Confident => "assertive and self-assured",
            Tone::Casual => "relaxed and conversational",
            Tone::Authoritative => "expert and commanding",
            Tone::Empathetic => "understanding and compassionate",
        }
    }
}

/// Copywriting strategy the rewrite should follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    DirectResponse,
    Storytelling,
    ProblemSolution,
    BenefitDriven,
    ScarcityBased,
    SocialProof,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::DirectResponse,
        Strategy::Storytelling,
        Strategy::ProblemSolution,
        Strategy::BenefitDriven,
        Strategy::ScarcityBased,
        Strategy::SocialProof,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::DirectResponse => "direct-response",
            Strategy::Storytelling => "storytelling",
            Strategy::ProblemSolution => "problem-solution",
            Strategy::BenefitDriven => "benefit-driven",
            Strategy::ScarcityBased => "scarcity-based",
            Strategy::SocialProof => "social-proof",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strategy::DirectResponse => "Direct Response - Clear Call-to-Action",
            Strategy::Storytelling => "Storytelling - Narrative & Engagement",
            Strategy::ProblemSolution => "Problem-Solution - Pain Points & Relief",
            Strategy::BenefitDriven => "Benefit-Driven - Features & Outcomes",
            Strategy::ScarcityBased => "Scarcity - Urgency & Limited Time",
            Strategy::SocialProof => "Social Proof - Testimonials & Trust",
        }
    }

    /// Phrase spliced into the rewrite instruction.
    pub fn description(self) -> &'static str {
        match self {
            Strategy::DirectResponse => "focus on immediate action and clear call-to-actions",
            Strategy::Storytelling => "use narrative elements to engage and connect",
            Strategy::ProblemSolution => "highlight pain points and present your solution",
            Strategy::BenefitDriven => "emphasize specific benefits and outcomes",
            Strategy::ScarcityBased => "create urgency through limited availability or time",
            Strategy::SocialProof => "leverage testimonials and social validation",
        }
    }
}

/// Audience segment the copy is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    General,
    B2b,
    B2c,
    Ecommerce,
    Local,
    Saas,
    Education,
    Health,
    Luxury,
    Parents,
}

impl Target {
    pub const ALL: [Target; 10] = [
        Target::General,
        Target::B2b,
        Target::B2c,
        Target::Ecommerce,
        Target::Local,
        Target::Saas,
        Target::Education,
        Target::Health,
        Target::Luxury,
        Target::Parents,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Target::General => "general",
            Target::B2b => "b2b",
            Target::B2c => "b2c",
            Target::Ecommerce => "ecommerce",
            Target::Local => "local",
            Target::Saas => "saas",
            Target::Education => "education",
            Target::Health => "health",
            Target::Luxury => "luxury",
            Target::Parents => "parents",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Target::General => "General Audience",
            Target::B2b => "Business Decision Makers",
            Target::B2c => "Consumer Products & Services",
            Target::Ecommerce => "Online Shoppers",
            Target::Local => "Local Business Customers",
            Target::Saas => "Software & Tech Users",
            Target::Education => "Students & Learners",
            Target::Health => "Health & Wellness",
            Target::Luxury => "Luxury & Premium",
            Target::Parents => "Parents & Families",
        }
    }

    /// `General` has no keyword set of its own and borrows the consumer one.
    pub fn resolved(self) -> Target {
        match self {
            Target::General => Target::B2c,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_clap_names() {
        for tone in Tone::ALL {
            let pv = tone.to_possible_value().unwrap();
            assert_eq!(pv.get_name(), tone.as_str());
        }
        for strategy in Strategy::ALL {
            let pv = strategy.to_possible_value().unwrap();
            assert_eq!(pv.get_name(), strategy.as_str());
        }
        for target in Target::ALL {
            let pv = target.to_possible_value().unwrap();
            assert_eq!(pv.get_name(), target.as_str());
        }
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&Strategy::DirectResponse).unwrap();
        assert_eq!(json, "\"direct-response\"");
        let target: Target = serde_json::from_str("\"b2b\"").unwrap();
        assert_eq!(target, Target::B2b);
    }

    #[test]
    fn general_resolves_to_b2c() {
        assert_eq!(Target::General.resolved(), Target::B2c);
        assert_eq!(Target::Saas.resolved(), Target::Saas);
    }
}
