use crate::retrieval::RetrievedDocument;

/// Build the generation prompt from the question and the retrieved
/// documents, contents stuffed in retrieval order. With no documents the
/// context block is empty and the model answers from the question alone.
pub fn build_prompt(question: &str, documents: &[RetrievedDocument]) -> String {
    let context = documents
        .iter()
        .map(|doc| doc.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\n\
{}\n\nQuestion: {}\nHelpful Answer:",
        context, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_question_and_contents_in_order() {
        let docs = vec![
            RetrievedDocument::new("A", "first chunk"),
            RetrievedDocument::new("B", "second chunk"),
        ];
        let prompt = build_prompt("Who goes first overall?", &docs);

        let first = prompt.find("first chunk").expect("first chunk present");
        let second = prompt.find("second chunk").expect("second chunk present");
        assert!(first < second);
        assert!(prompt.contains("Question: Who goes first overall?"));
    }

    #[test]
    fn empty_retrieval_still_asks_the_question() {
        let prompt = build_prompt("Who goes first overall?", &[]);
        assert!(prompt.contains("Question: Who goes first overall?"));
        assert!(prompt.ends_with("Helpful Answer:"));
    }

    #[test]
    fn titles_are_not_part_of_the_prompt() {
        let docs = vec![RetrievedDocument::new("Mock Draft 2024", "content")];
        let prompt = build_prompt("q", &docs);
        assert!(!prompt.contains("Mock Draft 2024"));
    }
}
