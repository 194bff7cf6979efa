use std::{fs, path::Path};

use pretty_assertions::assert_eq;
use redline::{
    EditCategory, EditKind, EditRecord, Reconciler, SessionState, compute_edit_records, encode,
    new_text, old_text, semantic_word_diff,
};
use serde::{Deserialize, de::DeserializeOwned};

#[derive(Debug, Deserialize)]
struct EditRecordsExample {
    name: String,
    old: String,
    new: String,
    #[serde(default)]
    category: Option<String>,
    records: Vec<ExpectedRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpectedRecord {
    kind: String,
    text: String,
    #[serde(default)]
    replacement_text: Option<String>,
    #[serde(default)]
    context_before: String,
    #[serde(default)]
    context_after: String,
}

impl ExpectedRecord {
    fn assert_matches(&self, example: &str, record: &EditRecord) {
        let kind = match record.kind() {
            EditKind::Insertion => "insertion",
            EditKind::Deletion => "deletion",
            EditKind::Replacement => "replacement",
            EditKind::Unchanged => "unchanged",
        };

        assert_eq!(kind, self.kind, "kind of a record in {example}");
        assert_eq!(record.text(), self.text, "text of a record in {example}");
        assert_eq!(
            record.replacement_text(),
            self.replacement_text.as_deref(),
            "replacement of a record in {example}"
        );
        assert_eq!(record.context_before(), self.context_before, "{example}");
        assert_eq!(record.context_after(), self.context_after, "{example}");
    }
}

#[derive(Debug, Deserialize)]
struct ReconciliationExample {
    name: String,
    text: String,
    selection: (usize, usize),
    increments: Vec<String>,
    decision: Decision,
    expected: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
enum Decision {
    Accept,
    Reject,
}

#[test]
fn test_edit_record_examples() {
    for example in &load_examples::<EditRecordsExample>("edit_records.yml") {
        let records = compute_edit_records(&example.old, &example.new);

        assert_eq!(
            records.len(),
            example.records.len(),
            "number of records in {}",
            example.name
        );
        for (id, (record, expected)) in records.iter().zip(&example.records).enumerate() {
            assert_eq!(record.id(), id);
            expected.assert_matches(&example.name, record);
        }

        let category = match example.category.as_deref() {
            Some("initialContent") => EditCategory::InitialContent,
            _ => EditCategory::Clarity,
        };
        assert!(
            records.iter().all(|record| record.category() == category),
            "category in {}",
            example.name
        );
    }
}

#[test]
fn test_reconciliation_examples() {
    for example in &load_examples::<ReconciliationExample>("reconciliation.yml") {
        let mut reconciler = Reconciler::new(&example.text);
        let (start, end) = example.selection;
        let handle = reconciler.start_reconciliation(start..end).unwrap();

        reconciler
            .consume_stream(handle, &example.increments)
            .unwrap();
        match example.decision {
            Decision::Accept => reconciler.accept_session(handle).unwrap(),
            Decision::Reject => reconciler.reject_session(handle).unwrap(),
        }

        assert_eq!(reconciler.text(), example.expected, "{}", example.name);

        let late = reconciler.feed_increment(handle, "too late");
        assert_eq!(late, Ok(()));
        assert_eq!(reconciler.text(), example.expected, "{}", example.name);
        assert!(reconciler.session_state(handle).unwrap().is_terminal());
    }
}

#[test]
fn test_diffs_reconstruct_both_texts() {
    let pairs = load_examples::<EditRecordsExample>("edit_records.yml")
        .into_iter()
        .map(|example| (example.old, example.new))
        .chain(
            load_examples::<ReconciliationExample>("reconciliation.yml")
                .into_iter()
                .flat_map(|example| {
                    let original = example.text;
                    example
                        .increments
                        .into_iter()
                        .map(move |increment| (original.clone(), increment))
                }),
        );

    for (old, new) in pairs {
        let diff = semantic_word_diff(&old, &new);

        assert_eq!(old_text(&diff), old);
        assert_eq!(new_text(&diff), new);
    }
}

#[test]
fn test_symbols_round_trip_for_examples() {
    for example in load_examples::<EditRecordsExample>("edit_records.yml") {
        for text in [&example.old, &example.new] {
            let (symbols, table) = encode(text);

            assert_eq!(&table.decode(&symbols), text);
        }
    }
}

#[test]
fn test_interleaved_sessions() {
    let mut reconciler = Reconciler::new("Fresh bread daily. Open until noon.");
    let bread = reconciler.start_reconciliation(0..17).unwrap();
    let hours = reconciler.start_reconciliation(19..34).unwrap();

    reconciler.feed_increment(bread, "Fresh").unwrap();
    reconciler.feed_increment(hours, "Open").unwrap();
    reconciler.feed_increment(bread, "Fresh sourdough").unwrap();
    reconciler.feed_increment(hours, "Open until six").unwrap();
    reconciler.feed_increment(bread, "Fresh sourdough daily").unwrap();

    reconciler.accept_session(hours).unwrap();
    reconciler.cancel(bread).unwrap();

    assert_eq!(reconciler.text(), "Fresh bread daily. Open until six.");
    assert_eq!(
        reconciler.session_state(bread).unwrap(),
        SessionState::Rejected
    );
}

fn load_examples<T: DeserializeOwned>(file_name: &str) -> Vec<T> {
    let path = Path::new("tests/examples").join(file_name);
    let file = fs::File::open(&path).expect("Failed to open example file");

    serde_yaml::Deserializer::from_reader(file)
        .map(|document| T::deserialize(document).expect("Failed to deserialize example"))
        .collect()
}
