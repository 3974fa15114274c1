//! Detection of English grammar mixed into Japanese summaries.
//!
//! Legitimate Latin text (quoted titles, URLs, paths, technical terms, log
//! messages, numbers with units) is masked first. Whatever Latin text is
//! left is matched against a tiered pattern list.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{EnglishCheckResult, MixSeverity};

/// Stands in for a masked span. Stripped from input up front so every
/// placeholder in the working text maps to exactly one recorded span.
const PLACEHOLDER: char = '\u{FFFC}';

/// Technical vocabulary exempt from mixing penalties.
static TECHNICAL_TERMS: &[&str] = &[
    // languages
    "JavaScript", "TypeScript", "Python", "Java", "Kotlin", "Swift", "Go", "Golang",
    "Rust", "Ruby", "PHP", "C++", "C#", "Scala", "Elixir", "Haskell", "Dart", "Lua",
    "Perl", "SQL", "HTML", "CSS", "Shell", "Bash", "WebAssembly", "Wasm",
    // frameworks and libraries
    "React", "React Native", "Vue", "Vue.js", "Angular", "Svelte", "Next.js", "Nuxt",
    "Node.js", "Deno", "Bun", "Express", "NestJS", "Django", "Flask", "FastAPI",
    "Rails", "Ruby on Rails", "Laravel", "Spring", "Spring Boot", "Tokio", "Axum",
    "Actix", "jQuery", "Tailwind", "Tailwind CSS", "Bootstrap", "Flutter", "SwiftUI",
    "Jetpack Compose", "PyTorch", "TensorFlow", "LangChain", "Hugging Face",
    // platforms and infrastructure
    "AWS", "GCP", "Azure", "Google Cloud", "Cloudflare", "Vercel", "Netlify", "Heroku",
    "Firebase", "Lambda", "S3", "EC2", "Docker", "Kubernetes", "Terraform", "Ansible",
    "Linux", "Ubuntu", "Windows", "macOS", "iOS", "Android", "Web",
    // protocols and formats
    "HTTP", "HTTPS", "TCP", "UDP", "REST", "GraphQL", "gRPC", "WebSocket", "OAuth",
    "JWT", "JSON", "YAML", "XML", "TLS", "SSL", "SSH", "DNS", "CDN", "URL", "CSV", "PDF",
    // general computing
    "API", "SDK", "CLI", "GUI", "UI", "UX", "CPU", "GPU", "RAM", "SSD", "OS", "VM", "IDE",
    "OSS", "SaaS", "PaaS", "IaaS", "DevOps", "MLOps",
    // AI
    "AI", "ML", "LLM", "RAG", "GPT", "ChatGPT", "OpenAI", "Claude", "Gemini", "Copilot",
    "GitHub Copilot",
    // databases
    "MySQL", "PostgreSQL", "SQLite", "MongoDB", "Redis", "DynamoDB", "Elasticsearch",
    "Supabase", "Prisma", "Firestore", "NoSQL",
    // editors and tooling
    "VS Code", "VSCode", "Vim", "Neovim", "Emacs", "IntelliJ", "Xcode", "Git", "GitHub",
    "GitLab", "GitHub Actions", "npm", "yarn", "pnpm", "Webpack", "Vite", "ESLint",
    "Prettier", "Jest", "Vitest", "Playwright", "Cypress", "Cargo", "Nginx", "Kafka",
    "Figma", "Slack", "Notion", "Zenn", "Qiita",
];

/// Terms containing `/`, matched before paths so they are not mistaken
/// for one.
static SLASH_TERMS: &[&str] = &["CI/CD", "TCP/IP", "UI/UX", "I/O", "A/B", "HTTP/2", "HTTP/3"];

fn alternation(terms: &[&str]) -> Regex {
    let mut sorted: Vec<&str> = terms.to_vec();
    sorted.sort_by_key(|t| std::cmp::Reverse(t.len()));
    let body = sorted
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{body})")).expect("term alternation is valid")
}

static TERM_RE: LazyLock<Regex> = LazyLock::new(|| alternation(TECHNICAL_TERMS));
static SLASH_TERM_RE: LazyLock<Regex> = LazyLock::new(|| alternation(SLASH_TERMS));

static CANONICAL_TERMS: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    TECHNICAL_TERMS
        .iter()
        .chain(SLASH_TERMS)
        .map(|t| (t.to_lowercase(), *t))
        .collect()
});

static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"「[^」]*」|『[^』]*』|"[^"]*"|“[^”]*”"#).expect("quote pattern is valid")
});

static QUOTED_LATIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"「[^」]*[A-Za-z][^」]*」|『[^』]*[A-Za-z][^』]*』|"[^"]*[A-Za-z][^"]*"|“[^”]*[A-Za-z][^”]*”"#)
        .expect("quoted-latin pattern is valid")
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[!-~]+").expect("url pattern is valid"));

static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:~|\.{1,2})?/[A-Za-z0-9_.\-]+(?:/[A-Za-z0-9_.\-]+)*/?|[A-Za-z0-9_.\-]+(?:/[A-Za-z0-9_.\-]+){2,}/?")
        .expect("path pattern is valid")
});

static LOG_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[A-Z][A-Za-z]*(?:Error|Exception)|ERROR|WARN(?:ING)?|Warning|INFO|DEBUG|FATAL)\s*:[ -~]*")
        .expect("log label pattern is valid")
});

static NUMBER_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+(?:\.[0-9]+)?\s?(?:[KMGTP]i?B|[kKMG]?bps|[mµun]?s|[kMG]?Hz|fps|px|rem|em|vh|vw|ms|[kKMB]|x|%)")
        .expect("number-unit pattern is valid")
});

/// A tiered mixing pattern.
struct MixPattern {
    regex: Regex,
    severity: MixSeverity,
    description: &'static str,
}

/// Evaluated in order; the verdict is the most severe tier that matched.
static MIX_PATTERNS: LazyLock<Vec<MixPattern>> = LazyLock::new(|| {
    let noun = r"[\p{Han}\p{Katakana}ー]";
    let ph = PLACEHOLDER;
    [
        (
            format!(r"(?:(?i:the|this|that|these|those|my|our|your|its|their)\s*|an?\s+){noun}+"),
            MixSeverity::Critical,
            "英語の限定詞と日本語名詞の混在",
        ),
        (
            format!(r"{noun}+\s*(?i:is|are|was|were|will|can|should|must|could|would)"),
            MixSeverity::Critical,
            "日本語名詞と英語の述語の混在",
        ),
        (
            format!(r"[A-Za-z]+(?:[ ,]+(?:[A-Za-z']+|{ph})){{3,}}"),
            MixSeverity::Major,
            "英語の文がそのまま含まれている",
        ),
        (
            r"(?i:please|let's|let us|make sure|be sure to|don't|do not|you should|you must|you can)"
                .to_string(),
            MixSeverity::Major,
            "英語の命令・依頼表現",
        ),
        (
            format!(
                r"{noun}+[がをはも]?\s*(?i:fast|slow|easy|simple|good|bad|great|better|best|nice|cool|new|old|big|small|powerful|useful|important|runs?|uses?|makes?|gets?|builds?|supports?|improves?|works?)"
            ),
            MixSeverity::Minor,
            "日本語名詞と英語の形容詞・動詞の混在",
        ),
    ]
    .into_iter()
    .map(|(pattern, severity, description)| MixPattern {
        regex: Regex::new(&pattern).expect("mix pattern is valid"),
        severity,
        description,
    })
    .collect()
});

fn is_ascii_word(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Whether `text[start..end]` does not cut through an ASCII word on
/// either side. Edges that are not ASCII word characters are always fine.
pub(super) fn ascii_word_edges(text: &str, start: usize, end: usize) -> bool {
    let span = &text[start..end];
    let cuts_before = span.chars().next().is_some_and(is_ascii_word)
        && text[..start].chars().next_back().is_some_and(is_ascii_word);
    let cuts_after = span.chars().next_back().is_some_and(is_ascii_word)
        && text[end..].chars().next().is_some_and(is_ascii_word);
    !cuts_before && !cuts_after
}

/// Working text with masked spans and the originals they replaced.
#[derive(Debug, Clone)]
struct MaskedText {
    text: String,
    spans: Vec<String>,
}

impl MaskedText {
    fn new(original: &str) -> Self {
        Self {
            text: original.replace(PLACEHOLDER, ""),
            spans: Vec::new(),
        }
    }

    fn as_str(&self) -> &str {
        &self.text
    }

    /// Replaces each accepted match with a placeholder and returns the
    /// masked strings in order. Matches overlapping an earlier mask are
    /// left alone.
    fn mask(
        &mut self,
        pattern: &Regex,
        accept: impl Fn(&str, usize, usize) -> bool,
    ) -> Vec<String> {
        let mut out = String::with_capacity(self.text.len());
        let mut previous = std::mem::take(&mut self.spans).into_iter();
        let mut spans = Vec::new();
        let mut masked = Vec::new();
        let mut last = 0;

        for m in pattern.find_iter(&self.text) {
            if m.as_str().contains(PLACEHOLDER) || !accept(&self.text, m.start(), m.end()) {
                continue;
            }
            let before = &self.text[last..m.start()];
            spans.extend(previous.by_ref().take(before.matches(PLACEHOLDER).count()));
            out.push_str(before);
            out.push(PLACEHOLDER);
            spans.push(m.as_str().to_string());
            masked.push(m.as_str().to_string());
            last = m.end();
        }

        let rest = &self.text[last..];
        spans.extend(previous);
        out.push_str(rest);

        self.text = out;
        self.spans = spans;
        masked
    }

    /// The slice `start..end` of the working text with masked spans put back.
    fn restore_range(&self, start: usize, end: usize) -> String {
        let mut index = self.text[..start].matches(PLACEHOLDER).count();
        let mut restored = String::new();
        for c in self.text[start..end].chars() {
            if c == PLACEHOLDER {
                if let Some(span) = self.spans.get(index) {
                    restored.push_str(span);
                }
                index += 1;
            } else {
                restored.push(c);
            }
        }
        restored
    }

    /// The original text.
    #[cfg(test)]
    fn restore(&self) -> String {
        self.restore_range(0, self.text.len())
    }
}

/// Runs the masking passes and returns the masked text together with the
/// allowlisted terms that were present, in order of first appearance.
fn mask_legitimate_latin(text: &str) -> (MaskedText, Vec<String>) {
    let mut masked = MaskedText::new(text);
    let always = |_: &str, _: usize, _: usize| true;

    masked.mask(&QUOTED_RE, always);
    masked.mask(&URL_RE, always);
    let mut found = masked.mask(&SLASH_TERM_RE, ascii_word_edges);
    masked.mask(&PATH_RE, ascii_word_edges);
    found.extend(masked.mask(&TERM_RE, ascii_word_edges));
    masked.mask(&LOG_LABEL_RE, ascii_word_edges);
    masked.mask(&NUMBER_UNIT_RE, ascii_word_edges);

    let mut allowed_terms: Vec<String> = Vec::new();
    for term in found {
        let canonical = CANONICAL_TERMS
            .get(&term.to_lowercase())
            .map_or(term.clone(), |t| (*t).to_string());
        if !allowed_terms.contains(&canonical) {
            allowed_terms.push(canonical);
        }
    }
    (masked, allowed_terms)
}

/// Checks a summary for English grammar mixed into Japanese.
///
/// Technical terms from a built-in allowlist are never penalized and are
/// reported back in `allowed_terms`. When the original text quotes a Latin
/// title, the severity is lowered by one tier.
///
/// # Examples
///
/// ```
/// use sumqc::content::check_english_mixing;
/// use sumqc::models::MixSeverity;
///
/// let result = check_english_mixing("DockerとKubernetesを使用");
/// assert!(!result.has_problematic_english);
/// assert_eq!(result.allowed_terms, vec!["Docker", "Kubernetes"]);
///
/// let result = check_english_mixing("This システムは高速です");
/// assert_eq!(result.severity, MixSeverity::Critical);
/// ```
pub fn check_english_mixing(text: &str) -> EnglishCheckResult {
    let (masked, allowed_terms) = mask_legitimate_latin(text);
    let working = masked.as_str();

    let mut severity = MixSeverity::None;
    let mut problematic_phrases = Vec::new();

    for pattern in MIX_PATTERNS.iter() {
        let first = pattern
            .regex
            .find_iter(working)
            .find(|m| ascii_word_edges(working, m.start(), m.end()));
        if let Some(m) = first {
            let phrase = masked.restore_range(m.start(), m.end());
            problematic_phrases.push(format!("「{}」: {}", phrase.trim(), pattern.description));
            severity = severity.max(pattern.severity);
        }
    }

    if severity != MixSeverity::None && QUOTED_LATIN_RE.is_match(text) {
        severity = severity.downgrade();
    }

    EnglishCheckResult {
        has_problematic_english: severity != MixSeverity::None,
        problematic_phrases,
        allowed_terms,
        severity,
    }
}
