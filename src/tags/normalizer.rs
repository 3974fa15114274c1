use std::collections::HashSet;

/// Number of tags kept per article.
pub const MAX_TAGS_PER_ARTICLE: usize = 5;

/// Lowercase spelling to canonical display form.
static ALIASES: &[(&str, &str)] = &[
    ("javascript", "JavaScript"),
    ("js", "JavaScript"),
    ("typescript", "TypeScript"),
    ("ts", "TypeScript"),
    ("node", "Node.js"),
    ("nodejs", "Node.js"),
    ("node.js", "Node.js"),
    ("react", "React"),
    ("reactjs", "React"),
    ("react.js", "React"),
    ("vue", "Vue.js"),
    ("vuejs", "Vue.js"),
    ("vue.js", "Vue.js"),
    ("next", "Next.js"),
    ("nextjs", "Next.js"),
    ("next.js", "Next.js"),
    ("python", "Python"),
    ("py", "Python"),
    ("golang", "Go"),
    ("go", "Go"),
    ("rust", "Rust"),
    ("java", "Java"),
    ("docker", "Docker"),
    ("k8s", "Kubernetes"),
    ("kubernetes", "Kubernetes"),
    ("aws", "AWS"),
    ("gcp", "GCP"),
    ("azure", "Azure"),
    ("github", "GitHub"),
    ("git", "Git"),
    ("graphql", "GraphQL"),
    ("postgres", "PostgreSQL"),
    ("postgresql", "PostgreSQL"),
    ("mysql", "MySQL"),
    ("mongo", "MongoDB"),
    ("mongodb", "MongoDB"),
    ("redis", "Redis"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("api", "API"),
    ("devops", "DevOps"),
    ("cicd", "CI/CD"),
    ("ci/cd", "CI/CD"),
    ("ai", "AI"),
    ("llm", "LLM"),
    ("chatgpt", "ChatGPT"),
    ("openai", "OpenAI"),
    ("ml", "機械学習"),
    ("machine learning", "機械学習"),
    ("machine-learning", "機械学習"),
    ("machinelearning", "機械学習"),
    ("deep learning", "深層学習"),
    ("deep-learning", "深層学習"),
    ("security", "セキュリティ"),
];

/// Post-processing layer for article tags.
///
/// Produces consistent display forms regardless of how the tags were
/// written upstream (by an author, a feed, or a language model).
pub struct TagNormalizer;

impl TagNormalizer {
    /// Canonicalizes a single tag.
    ///
    /// Surrounding whitespace is trimmed and inner whitespace runs are
    /// collapsed. Known spellings map to their canonical display form;
    /// unknown tags keep the casing they were written with.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumqc::tags::TagNormalizer;
    ///
    /// assert_eq!(TagNormalizer::normalize_tag("  nodejs "), "Node.js");
    /// assert_eq!(TagNormalizer::normalize_tag("ML"), "機械学習");
    /// assert_eq!(TagNormalizer::normalize_tag("Svelte"), "Svelte");
    /// ```
    #[must_use]
    pub fn normalize_tag(tag: &str) -> String {
        let collapsed = tag.split_whitespace().collect::<Vec<_>>().join(" ");
        let key = collapsed.to_lowercase();

        ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, canonical)| (*canonical).to_string())
            .unwrap_or(collapsed)
    }

    /// Normalizes a collection of tags, removing duplicates and empty strings.
    ///
    /// # Normalization rules
    ///
    /// - Applies `normalize_tag` to each tag
    /// - Deduplicates case-insensitively (keeps first occurrence)
    /// - Filters out empty strings after normalization
    /// - Preserves order of first occurrence
    ///
    /// # Examples
    ///
    /// ```
    /// use sumqc::tags::TagNormalizer;
    ///
    /// let tags = ["react", "React", "REACT", "Svelte"];
    /// assert_eq!(TagNormalizer::normalize_tags(tags), vec!["React", "Svelte"]);
    /// ```
    #[must_use]
    pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        tags.into_iter()
            .map(|tag| Self::normalize_tag(tag.as_ref()))
            .filter(|tag| !tag.is_empty() && seen.insert(tag.to_lowercase()))
            .collect()
    }

    /// Normalizes a comma-separated tag string.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumqc::tags::TagNormalizer;
    ///
    /// assert_eq!(
    ///     TagNormalizer::normalize_str("js, docker ,, k8s"),
    ///     vec!["JavaScript", "Docker", "Kubernetes"]
    /// );
    /// ```
    #[must_use]
    pub fn normalize_str(input: &str) -> Vec<String> {
        Self::normalize_tags(input.split(','))
    }
}

/// Cleans a raw tag list for storage on an article.
///
/// Trims each entry, drops blank ones, deduplicates case-insensitively
/// (first occurrence wins, keeping its casing) and keeps at most
/// [`MAX_TAGS_PER_ARTICLE`] entries. Unlike [`TagNormalizer`], no alias
/// mapping is applied. Callers holding optional tags can pass
/// `tags.into_iter().flatten()`.
///
/// # Examples
///
/// ```
/// use sumqc::tags::validate_and_normalize_tags;
///
/// assert_eq!(validate_and_normalize_tags(["React", "react", "REACT"]), vec!["React"]);
/// ```
pub fn validate_and_normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty() && seen.insert(tag.to_lowercase()))
        .take(MAX_TAGS_PER_ARTICLE)
        .collect()
}
