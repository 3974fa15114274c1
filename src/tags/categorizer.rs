use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of tag domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Languages,
    Frameworks,
    Tools,
    Concepts,
    Platforms,
    Databases,
    Mobile,
    AiMl,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Languages,
        Self::Frameworks,
        Self::Tools,
        Self::Concepts,
        Self::Platforms,
        Self::Databases,
        Self::Mobile,
        Self::AiMl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Languages => "languages",
            Self::Frameworks => "frameworks",
            Self::Tools => "tools",
            Self::Concepts => "concepts",
            Self::Platforms => "platforms",
            Self::Databases => "databases",
            Self::Mobile => "mobile",
            Self::AiMl => "ai-ml",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Keyword rules in resolution order. When a tag matches several
/// categories the earliest rule wins, so `api` lands in frameworks before
/// concepts and `redis` in tools before databases.
///
/// Keywords are stored in key form: lowercase, with `.`, `_`, `/` and spaces
/// replaced by `-`.
static RULES: &[(Category, &[&str])] = &[
    (
        Category::Languages,
        &[
            "javascript", "js", "typescript", "ts", "python", "java", "kotlin", "swift",
            "go", "golang", "rust", "ruby", "php", "c", "c++", "cpp", "c#", "csharp",
            "scala", "elixir", "haskell", "dart", "lua", "perl", "r", "sql", "html", "css",
            "shell", "bash", "zig", "wasm", "webassembly", "言語", "プログラミング言語",
        ],
    ),
    (
        Category::Frameworks,
        &[
            "react", "react-js", "vue", "vue-js", "angular", "svelte", "next", "nextjs",
            "next-js", "nuxt", "remix", "astro",
            "express", "nestjs", "django", "flask", "fastapi", "rails", "laravel", "spring",
            "spring-boot", "gin", "actix", "axum", "tokio", "node", "nodejs", "node-js", "deno", "bun",
            "jquery", "tailwind", "tailwindcss", "bootstrap", "graphql", "api", "rest",
            "grpc", "フレームワーク", "ライブラリ",
        ],
    ),
    (
        Category::Tools,
        &[
            "git", "github", "gitlab", "docker", "vscode", "vim", "neovim", "emacs",
            "webpack", "vite", "babel", "eslint", "prettier", "npm", "yarn", "pnpm",
            "cargo", "terraform", "ansible", "jenkins", "github-actions", "circleci",
            "redis", "elasticsearch", "kafka", "rabbitmq", "nginx", "jest", "vitest",
            "playwright", "cypress", "postman", "figma", "ツール", "エディタ",
        ],
    ),
    (
        Category::Databases,
        &[
            "mysql", "postgresql", "postgres", "sqlite", "mongodb", "mongo", "dynamodb",
            "cassandra", "mariadb", "oracle", "firestore", "supabase", "prisma", "redis",
            "elasticsearch",
            "database", "db", "nosql", "rdb", "rdbms", "データベース",
        ],
    ),
    (
        Category::Platforms,
        &[
            "aws", "gcp", "azure", "google-cloud", "vercel", "netlify", "heroku",
            "cloudflare", "firebase", "kubernetes", "k8s", "linux", "windows", "macos",
            "ubuntu", "serverless", "lambda", "cloud", "クラウド", "インフラ",
        ],
    ),
    (
        Category::Mobile,
        &[
            "ios", "android", "flutter", "react-native", "swiftui", "jetpack-compose",
            "xcode", "android-studio", "expo", "mobile", "モバイル", "スマホ", "アプリ開発",
        ],
    ),
    (
        Category::AiMl,
        &[
            "ai", "ml", "machine-learning", "deep-learning", "llm", "gpt", "chatgpt",
            "openai", "claude", "gemini", "pytorch", "tensorflow", "huggingface",
            "langchain", "rag", "nlp", "generative-ai", "機械学習", "深層学習",
            "人工知能", "生成ai", "自然言語処理",
        ],
    ),
    (
        Category::Concepts,
        &[
            "api", "architecture", "design-pattern", "microservices", "devops", "ci-cd",
            "cicd", "testing", "tdd", "security", "performance", "refactoring",
            "algorithm", "data-structure", "frontend", "backend", "agile", "scrum",
            "accessibility", "セキュリティ", "設計", "アーキテクチャ", "テスト",
            "パフォーマンス", "アルゴリズム", "リファクタリング", "フロントエンド",
            "バックエンド", "開発手法",
        ],
    ),
];

/// Tags grouped by category. Empty categories are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategorizedTags {
    #[serde(flatten)]
    pub categories: BTreeMap<Category, Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uncategorized: Vec<String>,
}

/// Per-category tag counts. Every category is present, zeros included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStatistics {
    #[serde(flatten)]
    pub counts: BTreeMap<Category, usize>,
    pub uncategorized: usize,
}

fn key_form(tag: &str) -> String {
    tag.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '.' | '_' | ' ' | '/' => '-',
            other => other,
        })
        .collect()
}

/// Whether `keyword` appears in `key` bounded by anything other than an
/// ASCII letter or digit, so `react入門` matches `react` while `javanese`
/// does not match `java`. A version number may follow a keyword that ends
/// in a letter (`vue3`). Non-ASCII keywords match anywhere since Japanese
/// has no separators.
fn partial_match(key: &str, keyword: &str) -> bool {
    if !keyword.is_ascii() {
        return key.contains(keyword);
    }
    let versioned = keyword.ends_with(|c: char| c.is_ascii_alphabetic());
    key.match_indices(keyword).any(|(start, matched)| {
        let before = key[..start].chars().next_back();
        let after = key[start + matched.len()..].chars().next();
        let open = !before.is_some_and(|c| c.is_ascii_alphanumeric());
        let close = match after {
            Some(c) if c.is_ascii_digit() => versioned,
            Some(c) => !c.is_ascii_alphanumeric(),
            None => true,
        };
        open && close
    })
}

/// Classifies a tag into a category.
///
/// Matching is case-insensitive, ignores surrounding whitespace and treats
/// `-`, `.` and `_` as the same separator. Exact keyword matches are tried
/// first across all rules; compound tags then fall back to partial matches
/// (`react-hooks` and `React入門` both resolve through `react`).
///
/// Returns `None` for tags that match no rule.
///
/// # Examples
///
/// ```
/// use sumqc::tags::{Category, categorize_tag};
///
/// assert_eq!(categorize_tag("  javascript  "), Some(Category::Languages));
/// assert_eq!(categorize_tag("react-hooks"), Some(Category::Frameworks));
/// assert_eq!(categorize_tag("unknown-tag"), None);
/// ```
pub fn categorize_tag(tag: &str) -> Option<Category> {
    let key = key_form(tag);
    if key.is_empty() {
        return None;
    }

    let exact = RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| *k == key));
    if let Some((category, _)) = exact {
        return Some(*category);
    }

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| partial_match(&key, k)))
        .map(|(category, _)| *category)
}

/// Groups tags by category, collecting unmatched tags under `uncategorized`.
pub fn categorize_multiple_tags<I, S>(tags: I) -> CategorizedTags
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = CategorizedTags::default();
    for tag in tags {
        let tag = tag.as_ref();
        match categorize_tag(tag) {
            Some(category) => result
                .categories
                .entry(category)
                .or_default()
                .push(tag.to_string()),
            None => result.uncategorized.push(tag.to_string()),
        }
    }
    result
}

/// Counts tags per category.
pub fn tag_statistics<I, S>(tags: I) -> TagStatistics
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: BTreeMap<Category, usize> =
        Category::ALL.into_iter().map(|c| (c, 0)).collect();
    let mut uncategorized = 0;

    for tag in tags {
        match categorize_tag(tag.as_ref()) {
            Some(category) => *counts.entry(category).or_default() += 1,
            None => uncategorized += 1,
        }
    }

    TagStatistics {
        counts,
        uncategorized,
    }
}
