use std::sync::{Arc, Mutex};

use ad_copy_guard::config::GeneratorConfig;
use ad_copy_guard::generator::{GenerationRequest, TextGenerator, MAX_OUTPUT_TOKENS, TEMPERATURE};
use ad_copy_guard::{
    band_for_score, score, AdAnalyzer, AnalysisRequest, AnalyzerError, Engagement, ScoreBand,
    Strategy, Target, Tone,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

const ACNE_COPY: &str = "Struggle with acne? Our unique, dermatologist-approved formula has helped 10,000+ people see results in 30 days \u{2014} limited spots for this month's cohort.";

const GUARANTEE_VIOLATION: &str = "Avoid absolute guarantees in ad claims";
const STRONG: &str =
    "Strong competitive positioning with unique value props, scarcity, and social proof";
const GOOD: &str = "Good competitive elements but could be strengthened";
const WEAK: &str = "Consider adding more competitive differentiators";

fn request(copy: &str, target: Target) -> AnalysisRequest {
    AnalysisRequest {
        copy: copy.to_string(),
        tone: Tone::Professional,
        strategy: Strategy::DirectResponse,
        target,
    }
}

/// Returns the same text every time and remembers the last request.
struct FixedGenerator {
    text: String,
    last: Mutex<Option<GenerationRequest>>,
}

impl FixedGenerator {
    fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            last: Mutex::new(None),
        })
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> ad_copy_guard::Result<String> {
        *self.last.lock().unwrap() = Some(request.clone());
        Ok(self.text.clone())
    }
}

struct RejectingGenerator;

#[async_trait]
impl TextGenerator for RejectingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> ad_copy_guard::Result<String> {
        Err(AnalyzerError::InvalidCredential)
    }
}

struct FlakyGenerator;

#[async_trait]
impl TextGenerator for FlakyGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> ad_copy_guard::Result<String> {
        Err(AnalyzerError::generation("connection reset"))
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn persuasive_health_copy_positions_strongly() {
    let card = score(&request(ACNE_COPY, Target::Health));
    assert!(
        card.policy_violations.is_empty(),
        "Expected no violations, got {:?}",
        card.policy_violations
    );
    assert_eq!(card.policy_score, 100);
    assert!(
        card.suggestions.is_empty(),
        "All principles present, got {:?}",
        card.suggestions
    );
    assert_eq!(card.viral_score, 83, "Five of six factors present");
    assert_eq!(card.competitive_analysis, STRONG);
    assert_eq!(card.target_audience_score, 0);
    assert_eq!(card.overall_score, 61);
    assert_eq!(card.engagement_prediction, Engagement::Low);
    assert_eq!(card.warnings.len(), 1, "Copy is longer than 125 chars");
    assert_eq!(
        card.keyword_suggestions,
        vec!["health", "wellness", "fitness", "nutrition", "lifestyle"]
    );
}

#[test]
fn every_policy_rule_fires_together() {
    let card = score(&request(
        "Before and after results guaranteed \u{2014} you are going to lose weight fast!",
        Target::General,
    ));
    assert_eq!(card.policy_violations.len(), 4, "{:?}", card.policy_violations);
    assert_eq!(card.policy_score, 0);
    assert_eq!(
        card.policy_violations,
        vec![
            "Before/After images or claims are not allowed in Facebook ads",
            GUARANTEE_VIOLATION,
            "Avoid directly addressing personal attributes",
            "Direct weight loss claims may violate Facebook policies",
        ]
    );
    assert_eq!(card.replacements.len(), 4);
    assert!(card.warnings.is_empty());
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

#[test]
fn guarantee_detected_in_any_case() {
    for copy in ["Results GUARANTEED.", "We Guarantee it", "guaranteed fun"] {
        let card = score(&request(copy, Target::General));
        assert!(
            card.policy_violations.iter().any(|v| v == GUARANTEE_VIOLATION),
            "Missed guarantee in {copy:?}"
        );
        assert!(card.policy_score <= 75);
    }
}

#[test]
fn policy_score_drops_per_violation() {
    let cases = [
        ("Fresh bread every morning.", 100),
        ("Results guaranteed.", 75),
        ("Guaranteed before and after.", 50),
        ("You are guaranteed a before and after.", 25),
        ("You are guaranteed a before and after weight loss.", 0),
    ];
    for (copy, expected) in cases {
        let card = score(&request(copy, Target::General));
        assert_eq!(card.policy_score, expected, "Policy score for {copy:?}");
    }
}

#[test]
fn personal_attribute_pattern_needs_whole_words() {
    let card = score(&request("Your plans are ready.", Target::General));
    assert!(
        card.policy_violations.is_empty(),
        "'your' is not 'you': {:?}",
        card.policy_violations
    );
    let card = score(&request("If you think we are late, call.", Target::General));
    assert_eq!(
        card.policy_violations,
        vec!["Avoid directly addressing personal attributes"]
    );
}

// ---------------------------------------------------------------------------
// Length and engagement
// ---------------------------------------------------------------------------

#[test]
fn length_threshold_counts_characters() {
    let at_limit = "\u{e9}".repeat(125);
    let card = score(&request(&at_limit, Target::General));
    assert!(card.warnings.is_empty(), "125 chars is within the limit");

    let over = "\u{e9}".repeat(126);
    let card = score(&request(&over, Target::General));
    assert_eq!(
        card.warnings,
        vec!["Ad copy length exceeds recommended length for optimal engagement"]
    );
    assert_eq!(
        card.replacements.last().map(String::as_str),
        Some("Consider breaking the message into multiple shorter ads while maintaining the core narrative")
    );
}

#[test]
fn short_on_target_copy_predicts_high_engagement() {
    let card = score(&request(
        "Your home, your family, your personal lifestyle upgrade.",
        Target::B2c,
    ));
    assert!(card.policy_violations.is_empty());
    assert_eq!(card.target_audience_score, 100);
    assert_eq!(card.engagement_prediction, Engagement::High);
}

#[test]
fn long_copy_predicts_low_engagement_regardless_of_audience() {
    let copy = "Your home, your family, your personal lifestyle upgrade. ".repeat(4);
    assert!(copy.chars().count() > 200);
    let card = score(&request(&copy, Target::B2c));
    assert_eq!(card.target_audience_score, 100);
    assert_eq!(card.engagement_prediction, Engagement::Low);
}

#[test]
fn mid_fit_copy_predicts_moderate_engagement() {
    let card = score(&request("Your home deserves better.", Target::B2c));
    assert_eq!(card.target_audience_score, 50);
    assert_eq!(card.engagement_prediction, Engagement::Moderate);
}

// ---------------------------------------------------------------------------
// Audience
// ---------------------------------------------------------------------------

#[test]
fn general_target_uses_consumer_keywords() {
    let copy = "Your home deserves better.";
    let general = score(&request(copy, Target::General));
    let b2c = score(&request(copy, Target::B2c));
    assert_eq!(general.target_audience_score, b2c.target_audience_score);
    assert_eq!(general.keyword_suggestions, b2c.keyword_suggestions);
}

#[test]
fn audience_keywords_match_as_written_against_lowered_copy() {
    for copy in ["Boost ROI this quarter", "Android apps", "Heroic results"] {
        let card = score(&request(copy, Target::B2b));
        assert_eq!(card.target_audience_score, 0, "Audience score for {copy:?}");
        assert_eq!(card.viral_score, 0, "Viral score for {copy:?}");
    }

    let card = score(&request("Business ROI for Android apps", Target::B2b));
    assert_eq!(card.target_audience_score, 17);
    assert_eq!(
        card.keyword_suggestions,
        vec!["company", "professional", "enterprise", "solution", "ROI"]
    );
}

// ---------------------------------------------------------------------------
// Persuasion and positioning
// ---------------------------------------------------------------------------

#[test]
fn empty_copy_gets_every_suggestion() {
    let card = score(&request("", Target::General));
    assert_eq!(
        card.suggestions,
        vec![
            "Add emotional problem agitation to create stronger resonance",
            "Highlight your unique solution or proprietary approach",
            "Include compelling social proof elements",
            "Add natural scarcity or urgency elements",
            "Use specific numbers or detailed results to build credibility",
        ]
    );
    assert_eq!(card.viral_score, 0);
    assert_eq!(card.target_audience_score, 0);
    assert_eq!(card.policy_score, 100);
    assert_eq!(card.overall_score, 33);
    assert_eq!(card.competitive_analysis, WEAK);
    assert_eq!(
        card.keyword_suggestions,
        vec!["you", "your", "lifestyle", "personal", "home"]
    );
}

#[test]
fn specificity_accepts_digits_or_words() {
    let specificity = "Use specific numbers or detailed results to build credibility";
    let with_digit = score(&request("Open 7 days", Target::General));
    assert!(!with_digit.suggestions.iter().any(|s| s == specificity));
    let with_word = score(&request("A precise fit", Target::General));
    assert!(!with_word.suggestions.iter().any(|s| s == specificity));
}

#[test]
fn viral_score_takes_sixth_steps() {
    let allowed = [0, 17, 33, 50, 67, 83, 100];
    let copies = [
        "",
        "Frustrated?",
        "Frustrated? Try our unique kit.",
        "Frustrated? Try our unique kit. Join today.",
        "Frustrated? Try our unique kit. Join today, limited run.",
        ACNE_COPY,
        "Frustrated? Your unique kit, 3 sizes. Join now, limited run.",
    ];
    for copy in copies {
        let card = score(&request(copy, Target::General));
        assert!(
            allowed.contains(&card.viral_score),
            "viral score {} for {copy:?}",
            card.viral_score
        );
    }
    let full = score(&request(copies[6], Target::General));
    assert_eq!(full.viral_score, 100);
}

#[test]
fn competitive_verdict_requires_unique_angle() {
    let cases = [
        ("Our unique kit. Limited spots. Join the community.", STRONG),
        ("Exclusive formula, limited run.", GOOD),
        ("Our unique method, loved by our community.", GOOD),
        ("Limited spots. Join our community.", WEAK),
        ("Plain copy.", WEAK),
    ];
    for (copy, expected) in cases {
        let card = score(&request(copy, Target::General));
        assert_eq!(card.competitive_analysis, expected, "Verdict for {copy:?}");
    }
}

#[test]
fn counted_customers_read_as_social_proof() {
    let card = score(&request(
        "Exclusive kit loved by 500 happy customers.",
        Target::General,
    ));
    assert!(
        !card
            .suggestions
            .iter()
            .any(|s| s == "Include compelling social proof elements"),
        "Counted customers should satisfy social proof: {:?}",
        card.suggestions
    );
    assert_eq!(card.competitive_analysis, GOOD);
}

#[test]
fn keyword_suggestions_are_deduplicated_and_capped() {
    let copy = "Struggle, tired of, frustrated, sick of, worried about? \
                Visit our local neighborhood city area nearby.";
    let card = score(&request(copy, Target::Local));
    assert_eq!(
        card.keyword_suggestions,
        vec![
            "community",
            "others have",
            "people are",
            "join",
            "success stories"
        ]
    );
}

#[test]
fn score_bands() {
    assert_eq!(band_for_score(100), ScoreBand::Good);
    assert_eq!(band_for_score(80), ScoreBand::Good);
    assert_eq!(band_for_score(79), ScoreBand::Fair);
    assert_eq!(band_for_score(60), ScoreBand::Fair);
    assert_eq!(band_for_score(59), ScoreBand::Poor);
}

// ---------------------------------------------------------------------------
// Full analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rewrite_is_returned_verbatim() {
    let generator = FixedGenerator::new("  Fresh copy.\n");
    let analyzer = AdAnalyzer::new(generator.clone());
    let req = AnalysisRequest {
        copy: "Old copy".to_string(),
        tone: Tone::Friendly,
        strategy: Strategy::SocialProof,
        target: Target::Local,
    };
    let result = analyzer.analyze(&req).await.unwrap();
    assert_eq!(result.optimized_copy, "  Fresh copy.\n");

    let sent = generator.last.lock().unwrap().clone().unwrap();
    assert!(sent.prompt.contains("warm and approachable tone"));
    assert!(sent
        .prompt
        .contains("leverage testimonials and social validation approach"));
    assert!(sent.prompt.contains("Old copy"));
    assert_eq!(sent.temperature, TEMPERATURE);
    assert_eq!(sent.max_tokens, MAX_OUTPUT_TOKENS);
}

#[tokio::test]
async fn blank_rewrite_falls_back_to_original() {
    for blank in ["", "   \n\t"] {
        let analyzer = AdAnalyzer::new(FixedGenerator::new(blank));
        let result = analyzer
            .analyze(&request(ACNE_COPY, Target::Health))
            .await
            .unwrap();
        assert_eq!(result.optimized_copy, ACNE_COPY);
    }
}

#[tokio::test]
async fn repeated_analysis_is_deterministic() {
    let analyzer = AdAnalyzer::new(FixedGenerator::new("Same text"));
    let req = request(ACNE_COPY, Target::Health);
    let first = analyzer.analyze(&req).await.unwrap();
    let second = analyzer.analyze(&req).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.scorecard, score(&req));
}

#[test]
fn from_config_leaves_the_key_in_place() {
    let mut config = GeneratorConfig::default();
    let analyzer = AdAnalyzer::from_config(&config).unwrap();
    assert!(!analyzer.is_configured());

    config.api_key = Some(SecretString::new("sk-test".into()));
    let analyzer = AdAnalyzer::from_config(&config).unwrap();
    assert!(analyzer.is_configured());
    let key = config.api_key.as_ref().unwrap();
    assert_eq!(key.expose_secret(), "sk-test");
}

#[tokio::test]
async fn missing_generator_is_not_initialized() {
    let analyzer = AdAnalyzer::unconfigured();
    assert!(!analyzer.is_configured());
    let err = analyzer
        .analyze(&request("Anything", Target::General))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::NotInitialized), "got {err:?}");
}

#[tokio::test]
async fn credential_errors_propagate_unchanged() {
    let analyzer = AdAnalyzer::new(Arc::new(RejectingGenerator));
    let err = analyzer
        .analyze(&request("Anything", Target::General))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::InvalidCredential), "got {err:?}");
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn other_failures_are_generation_errors() {
    let analyzer = AdAnalyzer::new(Arc::new(FlakyGenerator));
    let err = analyzer
        .analyze(&request("Anything", Target::General))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::Generation { .. }), "got {err:?}");
    assert!(err.to_string().contains("Please try again"));
}

#[tokio::test]
async fn json_output_is_flat() {
    let analyzer = AdAnalyzer::new(FixedGenerator::new("Rewritten"));
    let result = analyzer
        .analyze(&request(
            "Your home, your family, your personal lifestyle upgrade.",
            Target::B2c,
        ))
        .await
        .unwrap();
    let json = serde_json::to_string_pretty(&result).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in [
        "policy_score",
        "viral_score",
        "target_audience_score",
        "overall_score",
        "policy_violations",
        "warnings",
        "suggestions",
        "replacements",
        "keyword_suggestions",
        "engagement_prediction",
        "competitive_analysis",
        "optimized_copy",
    ] {
        assert!(parsed.get(key).is_some(), "missing {key}");
    }
    assert_eq!(parsed["engagement_prediction"], "High");
    assert_eq!(parsed["optimized_copy"], "Rewritten");
}
