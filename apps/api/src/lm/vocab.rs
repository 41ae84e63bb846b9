//! Fixed word-level vocabulary of résumé and job-posting terms.

use std::collections::HashMap;

pub const PAD_ID: usize = 0;
pub const UNK_ID: usize = 1;
pub const START_ID: usize = 2;
pub const END_ID: usize = 3;
pub const MASK_ID: usize = 4;

const SPECIAL_TOKENS: [&str; 5] = ["<PAD>", "<UNK>", "<START>", "<END>", "<MASK>"];

const COMMON_TERMS: &[&str] = &[
    // languages
    "python", "java", "javascript", "typescript", "c++", "go", "rust", "swift",
    // frameworks
    "react", "angular", "vue", "django", "flask", "spring", "nodejs", "express",
    // devops + cloud
    "docker", "kubernetes", "aws", "azure", "gcp", "jenkins", "gitlab", "terraform",
    // databases
    "sql", "mysql", "postgresql", "mongodb", "redis", "elasticsearch",
    // verbs
    "developed", "implemented", "designed", "engineered", "architected",
    "led", "managed", "coordinated", "optimized", "improved", "accelerated",
    "launched", "delivered", "built", "created", "maintained", "scaled",
    // nouns
    "team", "project", "feature", "product", "system", "application",
    "service", "platform", "infrastructure", "api", "microservice", "database",
    // seniority
    "senior", "junior", "lead", "principal", "staff", "full-stack", "back-end", "front-end",
    // general
    "experience", "years", "skills", "proficiency", "expertise", "knowledge",
    "requirements", "responsibilities", "qualifications", "benefits",
];

#[derive(Debug, Clone)]
pub struct Vocabulary {
    vocab_size: usize,
    word_to_id: HashMap<String, usize>,
    id_to_word: Vec<String>,
}

impl Vocabulary {
    /// Special tokens always occupy ids 0..5; terms are added while ids stay below `vocab_size`.
    pub fn new(vocab_size: usize) -> Self {
        let mut id_to_word: Vec<String> = SPECIAL_TOKENS.iter().map(|s| s.to_string()).collect();
        id_to_word.extend(
            COMMON_TERMS
                .iter()
                .take(vocab_size.saturating_sub(SPECIAL_TOKENS.len()))
                .map(|s| s.to_string()),
        );

        let word_to_id = id_to_word
            .iter()
            .enumerate()
            .map(|(id, word)| (word.clone(), id))
            .collect();

        Self {
            vocab_size,
            word_to_id,
            id_to_word,
        }
    }

    /// Configured upper bound; the model's embedding and output sizes.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Number of ids actually assigned.
    pub fn len(&self) -> usize {
        self.id_to_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_word.is_empty()
    }

    pub fn token_id(&self, word: &str) -> Option<usize> {
        self.word_to_id.get(word).copied()
    }

    /// Lower-cases, splits on whitespace, maps unknown words to `<UNK>`, then
    /// truncates or pads with `<PAD>` to exactly `max_len` ids.
    pub fn encode(&self, text: &str, max_len: usize) -> Vec<usize> {
        let mut ids: Vec<usize> = text
            .to_lowercase()
            .split_whitespace()
            .take(max_len)
            .map(|word| self.token_id(word).unwrap_or(UNK_ID))
            .collect();
        ids.resize(max_len, PAD_ID);
        ids
    }

    /// Joins known words with single spaces. Special tokens and unassigned ids are dropped.
    pub fn decode(&self, ids: &[usize]) -> String {
        ids.iter()
            .filter(|id| **id >= SPECIAL_TOKENS.len())
            .filter_map(|id| self.id_to_word.get(*id))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn batch_encode<S: AsRef<str>>(&self, texts: &[S], max_len: usize) -> Vec<Vec<usize>> {
        texts.iter().map(|t| self.encode(t.as_ref(), max_len)).collect()
    }

    pub fn batch_decode(&self, batch: &[Vec<usize>]) -> Vec<String> {
        batch.iter().map(|ids| self.decode(ids)).collect()
    }
}
