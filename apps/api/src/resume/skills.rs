//! Canonical skill vocabulary, alias normalization, and text-scan extraction.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

const TECH_SKILLS: &[&str] = &[
    "javascript", "typescript", "python", "java", "c++", "c#", "go", "golang", "rust",
    "ruby", "php", "swift", "kotlin", "scala", "r", "matlab", "perl", "haskell",
    "react", "reactjs", "react.js", "vue", "vuejs", "vue.js", "angular", "angularjs",
    "svelte", "nextjs", "next.js", "nuxt", "nuxtjs", "gatsby", "remix",
    "html", "html5", "css", "css3", "sass", "scss", "less", "tailwind", "tailwindcss",
    "bootstrap", "material-ui", "mui", "chakra-ui", "styled-components",
    "webpack", "vite", "rollup", "parcel", "babel", "esbuild",
    "node", "nodejs", "node.js", "express", "expressjs", "fastify", "nestjs", "koa",
    "django", "flask", "fastapi", "spring", "spring boot", "springboot",
    "rails", "ruby on rails", "laravel", "symfony",
    "sql", "mysql", "postgresql", "postgres", "sqlite", "mariadb", "oracle", "mssql",
    "mongodb", "mongoose", "dynamodb", "cassandra", "redis", "memcached",
    "elasticsearch", "neo4j", "firebase", "firestore", "supabase",
    "prisma", "sequelize", "typeorm", "drizzle", "knex",
    "aws", "amazon web services", "ec2", "s3", "lambda", "rds", "ecs", "eks",
    "azure", "microsoft azure", "gcp", "google cloud", "google cloud platform",
    "heroku", "vercel", "netlify", "railway", "render", "digitalocean",
    "docker", "kubernetes", "k8s", "helm", "openshift",
    "terraform", "pulumi", "cloudformation", "ansible", "puppet", "chef",
    "jenkins", "github actions", "gitlab ci", "circleci", "travis ci",
    "nginx", "apache", "prometheus", "grafana", "datadog", "splunk",
    "ios", "android", "react native", "flutter", "xamarin", "ionic",
    "machine learning", "ml", "deep learning", "tensorflow", "pytorch", "keras",
    "pandas", "numpy", "scipy", "matplotlib", "opencv", "nlp",
    "jest", "mocha", "chai", "jasmine", "vitest", "cypress", "playwright", "selenium",
    "git", "github", "gitlab", "bitbucket", "linux", "unix", "bash", "shell",
    "rest", "restful", "graphql", "grpc", "websockets", "oauth", "jwt",
    "agile", "scrum", "jira", "confluence", "figma", "sketch",
];

const SOFT_SKILLS: &[&str] = &[
    "leadership",
    "communication",
    "teamwork",
    "problem solving",
    "critical thinking",
    "creativity",
    "adaptability",
    "time management",
    "project management",
    "mentoring",
    "coaching",
    "collaboration",
];

static SKILL_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("reactjs", "react"),
        ("react.js", "react"),
        ("vuejs", "vue"),
        ("vue.js", "vue"),
        ("nodejs", "node.js"),
        ("node", "node.js"),
        ("nextjs", "next.js"),
        ("postgresql", "postgres"),
        ("golang", "go"),
        ("k8s", "kubernetes"),
        ("amazon web services", "aws"),
        ("google cloud platform", "gcp"),
    ])
});

/// One word-boundary, case-insensitive matcher per vocabulary term, compiled
/// once for the process.
static SKILL_MATCHERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    TECH_SKILLS
        .iter()
        .chain(SOFT_SKILLS.iter())
        .map(|skill| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(skill));
            (*skill, Regex::new(&pattern).expect("static skill pattern"))
        })
        .collect()
});

/// Lowercases, trims, and resolves spelling variants to one canonical form.
/// Idempotent: normalizing an already-normalized skill is a no-op.
pub fn normalize_skill(skill: &str) -> String {
    let lower = skill.to_lowercase().trim().to_string();
    SKILL_ALIASES
        .get(lower.as_str())
        .map(|s| s.to_string())
        .unwrap_or(lower)
}

pub fn is_known_skill(word: &str) -> bool {
    let normalized = normalize_skill(word);
    TECH_SKILLS.contains(&normalized.as_str()) || SOFT_SKILLS.contains(&normalized.as_str())
}

/// Scans text for every vocabulary term and returns the sorted, deduplicated
/// list of canonical skill names found. Alphabetical order is deliberate:
/// deterministic output, not order-of-appearance.
pub fn extract_all_skills(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut found = BTreeSet::new();

    for (skill, pattern) in SKILL_MATCHERS.iter() {
        if pattern.is_match(&text_lower) {
            found.insert(normalize_skill(skill));
        }
    }

    found.into_iter().collect()
}
