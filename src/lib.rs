use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod generator;
pub mod options;
pub mod store;

pub use error::{AnalyzerError, Result, StoreError};
pub use generator::{GenerationRequest, OpenAiGenerator, TextGenerator};
pub use options::{Strategy, Target, Tone};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub copy: String,
    pub tone: Tone,
    pub strategy: Strategy,
    pub target: Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Engagement {
    High,
    Moderate,
    Low,
}

/// Every field of an analysis that does not depend on the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scorecard {
    pub policy_score: u32,
    pub viral_score: u32,
    pub target_audience_score: u32,
    pub overall_score: u32,
    pub policy_violations: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    pub replacements: Vec<String>,
    pub keyword_suggestions: Vec<String>,
    pub engagement_prediction: Engagement,
    pub competitive_analysis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub scorecard: Scorecard,
    pub optimized_copy: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

struct Hyperparameters {
    max_recommended_chars: usize,
    low_engagement_chars: usize,
    high_audience_above: u32,
    low_audience_below: u32,
    violation_penalty: u32,
    keyword_suggestion_cap: usize,
    score_max: u32,
    band_good_min: u32,
    band_fair_min: u32,
}

static HP: Hyperparameters = Hyperparameters {
    max_recommended_chars: 125,
    low_engagement_chars: 200,
    high_audience_above: 70,
    low_audience_below: 30,
    violation_penalty: 25,
    keyword_suggestion_cap: 5,
    score_max: 100,
    band_good_min: 80,
    band_fair_min: 60,
};

// ---------------------------------------------------------------------------
// Lexicons
// ---------------------------------------------------------------------------

/// One lexicon entry: a literal looked up by substring containment in the
/// lowercased copy, or a compiled pattern.
#[derive(Debug)]
pub enum Term {
    Literal(&'static str),
    Pattern(Regex),
}

impl Term {
    /// `lowered` must already be lowercased.
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Term::Literal(word) => lowered.contains(*word),
            Term::Pattern(re) => re.is_match(lowered),
        }
    }

    fn keyword(&self) -> Option<&'static str> {
        match self {
            Term::Literal(word) => Some(*word),
            Term::Pattern(_) => None,
        }
    }
}

fn literals(words: &[&'static str]) -> Vec<Term> {
    words.iter().map(|w| Term::Literal(*w)).collect()
}

fn any_match(terms: &[Term], lowered: &str) -> bool {
    terms.iter().any(|t| t.matches(lowered))
}

fn missing_keywords<'a>(
    terms: &'a [Term],
    lowered: &'a str,
) -> impl Iterator<Item = &'static str> + 'a {
    terms
        .iter()
        .filter(move |t| !t.matches(lowered))
        .filter_map(Term::keyword)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Principle {
    ProblemAgitation,
    UniqueSolution,
    SocialProof,
    Scarcity,
    Specificity,
}

impl Principle {
    pub const ALL: [Principle; 5] = [
        Principle::ProblemAgitation,
        Principle::UniqueSolution,
        Principle::SocialProof,
        Principle::Scarcity,
        Principle::Specificity,
    ];

    pub fn terms(self) -> &'static [Term] {
        match self {
            Principle::ProblemAgitation => &PROBLEM_AGITATION,
            Principle::UniqueSolution => &UNIQUE_SOLUTION,
            Principle::SocialProof => &SOCIAL_PROOF,
            Principle::Scarcity => &SCARCITY,
            Principle::Specificity => &SPECIFICITY,
        }
    }

    pub fn is_present(self, lowered: &str) -> bool {
        any_match(self.terms(), lowered)
    }

    fn missing_advice(self) -> &'static str {
        match self {
            Principle::ProblemAgitation => {
                "Add emotional problem agitation to create stronger resonance"
            }
            Principle::UniqueSolution => "Highlight your unique solution or proprietary approach",
            Principle::SocialProof => "Include compelling social proof elements",
            Principle::Scarcity => "Add natural scarcity or urgency elements",
            Principle::Specificity => {
                "Use specific numbers or detailed results to build credibility"
            }
        }
    }
}

static PROBLEM_AGITATION: Lazy<Vec<Term>> = Lazy::new(|| {
    literals(&[
        "struggle",
        "tired of",
        "frustrated",
        "sick of",
        "worried about",
    ])
});

static UNIQUE_SOLUTION: Lazy<Vec<Term>> = Lazy::new(|| {
    literals(&["unique", "exclusive", "proprietary", "special", "innovative"])
});

static SOCIAL_PROOF: Lazy<Vec<Term>> = Lazy::new(|| {
    let mut terms = literals(&[
        "others have",
        "people are",
        "community",
        "join",
        "success stories",
    ]);
    // Extends the base keyword list: counted groups like "10,000+ people" or
    // "500 happy customers" also read as social proof.
    terms.push(Term::Pattern(
        Regex::new(
            r"\b\d[\d,.]*\+?\s+(?:happy\s+)?(?:people|customers|clients|users|members|students|families)\b",
        )
        .unwrap(),
    ));
    terms
});

static SCARCITY: Lazy<Vec<Term>> = Lazy::new(|| {
    literals(&[
        "limited",
        "exclusive access",
        "spots available",
        "closing soon",
        "early access",
    ])
});

static SPECIFICITY: Lazy<Vec<Term>> = Lazy::new(|| {
    let mut terms = vec![Term::Pattern(Regex::new(r"\d+").unwrap())];
    terms.extend(literals(&["specific", "exact", "precise", "detailed"]));
    terms
});

static AUDIENCE: Lazy<Vec<(Target, Vec<Term>)>> = Lazy::new(|| {
    vec![
        (
            Target::B2b,
            literals(&[
                "business",
                "company",
                "professional",
                "enterprise",
                "solution",
                "ROI",
            ]),
        ),
        (
            Target::B2c,
            literals(&["you", "your", "lifestyle", "personal", "home", "family"]),
        ),
        (
            Target::Ecommerce,
            literals(&["shop", "buy", "order", "shipping", "discount", "sale"]),
        ),
        (
            Target::Local,
            literals(&[
                "local",
                "community",
                "neighborhood",
                "city",
                "area",
                "nearby",
            ]),
        ),
        (
            Target::Saas,
            literals(&[
                "software",
                "platform",
                "features",
                "integration",
                "subscription",
            ]),
        ),
        (
            Target::Education,
            literals(&["learn", "course", "training", "skills", "certificate"]),
        ),
        (
            Target::Health,
            literals(&["health", "wellness", "fitness", "nutrition", "lifestyle"]),
        ),
        (
            Target::Luxury,
            literals(&["premium", "exclusive", "luxury", "elite", "sophisticated"]),
        ),
        (
            Target::Parents,
            literals(&["kids", "children", "family", "parenting", "school"]),
        ),
    ]
});

/// Keyword set for an audience segment. `General` resolves to the consumer set.
pub fn audience_terms(target: Target) -> &'static [Term] {
    let resolved = target.resolved();
    AUDIENCE
        .iter()
        .find(|(t, _)| *t == resolved)
        .map(|(_, terms)| terms.as_slice())
        .unwrap_or(&[])
}

struct PolicyRule {
    terms: Vec<Term>,
    violation: &'static str,
    replacement: &'static str,
}

static POLICY_RULES: Lazy<Vec<PolicyRule>> = Lazy::new(|| {
    vec![
        PolicyRule {
            terms: literals(&["before and after"]),
            violation: "Before/After images or claims are not allowed in Facebook ads",
            replacement: "Replace \"before and after\" with \"transformation journey\" or \"success story\"",
        },
        PolicyRule {
            terms: literals(&["guarantee", "guaranteed"]),
            violation: "Avoid absolute guarantees in ad claims",
            replacement: "Replace \"guarantee/guaranteed\" with \"proven approach\" or \"demonstrated results\"",
        },
        PolicyRule {
            terms: vec![Term::Pattern(Regex::new(r"(?i)\byou\b.*\bare\b").unwrap())],
            violation: "Avoid directly addressing personal attributes",
            replacement: "Rephrase personal statements to focus on the journey or possibility",
        },
        PolicyRule {
            terms: literals(&["weight loss", "lose weight"]),
            violation: "Direct weight loss claims may violate Facebook policies",
            replacement: "Focus on \"healthy lifestyle\" or \"wellness journey\" instead of weight loss",
        },
    ]
});

const LENGTH_WARNING: &str = "Ad copy length exceeds recommended length for optimal engagement";
const LENGTH_REPLACEMENT: &str =
    "Consider breaking the message into multiple shorter ads while maintaining the core narrative";

const VERDICT_STRONG: &str =
    "Strong competitive positioning with unique value props, scarcity, and social proof";
const VERDICT_GOOD: &str = "Good competitive elements but could be strengthened";
const VERDICT_WEAK: &str = "Consider adding more competitive differentiators";

// ---------------------------------------------------------------------------
// Rule implementations
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RuleOutput {
    violations: Vec<String>,
    warnings: Vec<String>,
    replacements: Vec<String>,
}

fn rule_policy(lowered: &str) -> RuleOutput {
    let mut out = RuleOutput::default();
    for rule in POLICY_RULES.iter() {
        if any_match(&rule.terms, lowered) {
            out.violations.push(rule.violation.to_string());
            out.replacements.push(rule.replacement.to_string());
        }
    }
    out
}

fn rule_length(char_count: usize) -> RuleOutput {
    let mut out = RuleOutput::default();
    if char_count > HP.max_recommended_chars {
        out.warnings.push(LENGTH_WARNING.to_string());
        out.replacements.push(LENGTH_REPLACEMENT.to_string());
    }
    out
}

struct AudienceFit {
    matched: Vec<&'static str>,
    score: u32,
}

fn audience_fit(lowered: &str, target: Target) -> AudienceFit {
    let terms = audience_terms(target);
    let matched: Vec<&'static str> = terms
        .iter()
        .filter(|t| t.matches(lowered))
        .filter_map(Term::keyword)
        .collect();
    let score = if terms.is_empty() {
        0
    } else {
        (matched.len() as f64 / terms.len() as f64 * 100.0).round() as u32
    };
    AudienceFit { matched, score }
}

fn predict_engagement(audience_score: u32, char_count: usize) -> Engagement {
    if audience_score > HP.high_audience_above && char_count <= HP.max_recommended_chars {
        Engagement::High
    } else if audience_score < HP.low_audience_below || char_count > HP.low_engagement_chars {
        Engagement::Low
    } else {
        Engagement::Moderate
    }
}

fn competitive_verdict(lowered: &str) -> &'static str {
    let unique = Principle::UniqueSolution.is_present(lowered);
    let scarcity = Principle::Scarcity.is_present(lowered);
    let social = Principle::SocialProof.is_present(lowered);

    // Scarcity plus social proof without a unique angle does not count as "good".
    if unique && scarcity && social {
        VERDICT_STRONG
    } else if (unique && scarcity) || (unique && social) {
        VERDICT_GOOD
    } else {
        VERDICT_WEAK
    }
}

fn principle_suggestions(lowered: &str) -> Vec<String> {
    Principle::ALL
        .iter()
        .filter(|p| !p.is_present(lowered))
        .map(|p| p.missing_advice().to_string())
        .collect()
}

fn keyword_gaps(lowered: &str, target: Target) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    missing_keywords(audience_terms(target), lowered)
        .chain(missing_keywords(Principle::ProblemAgitation.terms(), lowered))
        .chain(missing_keywords(Principle::SocialProof.terms(), lowered))
        .filter(|w| seen.insert(*w))
        .take(HP.keyword_suggestion_cap)
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn policy_score(violation_count: usize) -> u32 {
    let penalty = (violation_count as u32).saturating_mul(HP.violation_penalty);
    HP.score_max.saturating_sub(penalty)
}

fn viral_score(lowered: &str, audience_matched: bool) -> u32 {
    let mut factors: Vec<bool> = Principle::ALL.iter().map(|p| p.is_present(lowered)).collect();
    factors.push(audience_matched);
    let present = factors.iter().filter(|f| **f).count();
    (present as f64 / factors.len() as f64 * HP.score_max as f64).round() as u32
}

fn overall_score(policy: u32, viral: u32, audience: u32) -> u32 {
    ((policy + viral + audience) as f64 / 3.0).round() as u32
}

pub fn band_for_score(score: u32) -> ScoreBand {
    if score >= HP.band_good_min {
        ScoreBand::Good
    } else if score >= HP.band_fair_min {
        ScoreBand::Fair
    } else {
        ScoreBand::Poor
    }
}

fn merge_output(
    violations: &mut Vec<String>,
    warnings: &mut Vec<String>,
    replacements: &mut Vec<String>,
    out: RuleOutput,
) {
    violations.extend(out.violations);
    warnings.extend(out.warnings);
    replacements.extend(out.replacements);
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run every detector over the copy. Pure and total.
pub fn score(request: &AnalysisRequest) -> Scorecard {
    let lowered = request.copy.to_lowercase();
    let char_count = request.copy.chars().count();

    let mut violations: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut replacements: Vec<String> = Vec::new();

    // 1. Policy violations
    merge_output(
        &mut violations,
        &mut warnings,
        &mut replacements,
        rule_policy(&lowered),
    );
    // 2. Length
    merge_output(
        &mut violations,
        &mut warnings,
        &mut replacements,
        rule_length(char_count),
    );

    let fit = audience_fit(&lowered, request.target);
    let engagement = predict_engagement(fit.score, char_count);
    let competitive = competitive_verdict(&lowered);
    let suggestions = principle_suggestions(&lowered);
    let keywords = keyword_gaps(&lowered, request.target);

    let policy = policy_score(violations.len());
    let viral = viral_score(&lowered, !fit.matched.is_empty());
    let overall = overall_score(policy, viral, fit.score);

    tracing::debug!(
        violations = violations.len(),
        audience_matches = fit.matched.len(),
        policy,
        viral,
        overall,
        "scored ad copy"
    );

    Scorecard {
        policy_score: policy,
        viral_score: viral,
        target_audience_score: fit.score,
        overall_score: overall,
        policy_violations: violations,
        warnings,
        suggestions,
        replacements,
        keyword_suggestions: keywords,
        engagement_prediction: engagement,
        competitive_analysis: competitive.to_string(),
    }
}

/// Scores copy and asks a [`TextGenerator`] for an optimized rewrite.
#[derive(Clone, Default)]
pub struct AdAnalyzer {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AdAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// An analyzer with no generation service; `analyze` fails with
    /// [`AnalyzerError::NotInitialized`].
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Build an OpenAI-backed analyzer when a credential is configured.
    pub fn from_config(config: &config::GeneratorConfig) -> Result<Self> {
        match &config.api_key {
            Some(key) => {
                let generator = OpenAiGenerator::new(config, key.clone())?;
                Ok(Self::new(Arc::new(generator)))
            }
            None => {
                tracing::warn!("no API key configured; rewrites are unavailable");
                Ok(Self::unconfigured())
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Full analysis. Either every field is produced or the generation error
    /// is returned unchanged.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(AnalyzerError::NotInitialized)?;

        let scorecard = score(request);
        let gen_request =
            GenerationRequest::for_copy(&request.copy, request.tone, request.strategy);
        let text = generator.generate(&gen_request).await.map_err(|e| {
            tracing::warn!(error = %e, "optimized copy generation failed");
            e
        })?;

        let optimized_copy = if text.trim().is_empty() {
            request.copy.clone()
        } else {
            text
        };

        tracing::info!(
            overall = scorecard.overall_score,
            target = request.target.as_str(),
            "analysis complete"
        );
        Ok(AnalysisResult {
            scorecard,
            optimized_copy,
        })
    }
}
