use chrono::DateTime;
use log::warn;
use std::collections::BTreeMap;

use crate::classifier::SentimentClassifier;
use crate::vk::{Comment, Post};

/// One analyzed item, as consumed by presentation and export layers.
#[derive(Debug, Clone)]
pub struct SentimentRecord {
    /// Unix timestamp of the post or comment.
    pub date: i64,
    pub text: String,
    /// A label from the classifier's fixed vocabulary.
    pub sentiment: String,
}

impl SentimentRecord {
    /// Human-readable UTC date for tables and logs.
    pub fn formatted_date(&self) -> String {
        DateTime::from_timestamp(self.date, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| self.date.to_string())
    }
}

/// Classifies a stream of dated texts, one `predict` call per item.
///
/// A failed item is logged and skipped; the batch continues. Retrying is
/// deliberately not done here.
pub fn analyze_texts<I>(classifier: &SentimentClassifier, items: I) -> Vec<SentimentRecord>
where
    I: IntoIterator<Item = (i64, String)>,
{
    let mut records = Vec::new();
    for (date, text) in items {
        match classifier.predict(&text) {
            Ok(sentiment) => records.push(SentimentRecord { date, text, sentiment }),
            Err(e) => warn!("Skipping item dated {}: {}", date, e),
        }
    }
    records
}

pub fn analyze_posts(classifier: &SentimentClassifier, posts: &[Post]) -> Vec<SentimentRecord> {
    analyze_texts(classifier, posts.iter().map(|p| (p.date, p.text.clone())))
}

pub fn analyze_comments(
    classifier: &SentimentClassifier,
    comments: &[Comment],
) -> Vec<SentimentRecord> {
    analyze_texts(classifier, comments.iter().map(|c| (c.date, c.text.clone())))
}

/// Tallies records per sentiment label, ordered by label.
pub fn count_by_sentiment(records: &[SentimentRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.sentiment.clone()).or_insert(0) += 1;
    }
    counts
}

/// Converts a sentiment tally into percentages of the total.
pub fn sentiment_percentages(counts: &BTreeMap<String, usize>) -> BTreeMap<String, f64> {
    let total: usize = counts.values().sum();
    counts
        .iter()
        .map(|(label, &count)| {
            let share = if total == 0 {
                0.0
            } else {
                (count as f64 / total as f64) * 100.0
            };
            (label.clone(), share)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: i64, sentiment: &str) -> SentimentRecord {
        SentimentRecord {
            date,
            text: "текст".into(),
            sentiment: sentiment.into(),
        }
    }

    #[test]
    fn test_count_by_sentiment() {
        let records = vec![
            record(1, "позитив"),
            record(2, "негатив"),
            record(3, "позитив"),
        ];
        let counts = count_by_sentiment(&records);
        assert_eq!(counts["позитив"], 2);
        assert_eq!(counts["негатив"], 1);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_sentiment_percentages_sum_to_hundred() {
        let records = vec![
            record(1, "позитив"),
            record(2, "позитив"),
            record(3, "негатив"),
            record(4, "нейтрально"),
        ];
        let percentages = sentiment_percentages(&count_by_sentiment(&records));
        assert_eq!(percentages["позитив"], 50.0);
        let total: f64 = percentages.values().sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_of_empty_tally() {
        let percentages = sentiment_percentages(&BTreeMap::new());
        assert!(percentages.is_empty());
    }

    #[test]
    fn test_formatted_date() {
        let formatted = record(0, "нейтрально").formatted_date();
        assert_eq!(formatted, "1970-01-01 00:00");
    }
}
