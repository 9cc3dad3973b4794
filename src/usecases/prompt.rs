//! Prompt composer. Pure function, no I/O, no failure modes.
//!
//! The template is the entire behavioral contract for scope enforcement:
//! there is no local classifier, the refusal instruction is delegated to the
//! downstream model.

/// Literal refusal sentence the model is instructed to emit for out-of-scope
/// or unanswerable questions.
pub const REFUSAL_SENTENCE: &str = "I'm sorry, this question is outside the scope of the invoice details or the provided text does not contain the requested information.";

/// Build the instruction prompt embedding the extracted invoice text and the
/// user question verbatim.
pub fn compose(text: &str, question: &str) -> String {
    format!(
        r#"You are an AI expert in processing Arabic invoices. The invoice contains the following extracted text:

{text}

Based on this text, answer questions strictly related to the invoice details, such as:
- Product names, quantities, and prices.
- Invoice numbers and dates.
- Total amounts and specific product costs.

If the question is outside the scope of invoice-related details or the answer cannot be derived from the text, respond with:
"{refusal}"

Question: {question}

Your response should be clear, concise, and directly address the user's question or clarify limitations."#,
        text = text,
        refusal = REFUSAL_SENTENCE,
        question = question,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_text_and_question_verbatim() {
        let text = "INVOICE #102 TOTAL $45.00";
        let question = "What is the total amount?";
        let prompt = compose(text, question);
        assert!(prompt.contains(text));
        assert!(prompt.contains(question));
    }

    #[test]
    fn always_contains_refusal_sentence() {
        let prompt = compose("", "");
        assert!(prompt.contains(REFUSAL_SENTENCE));
    }

    #[test]
    fn empty_text_is_valid_input() {
        // Zero OCR detections yield an empty string; composing must not
        // treat that as special.
        let prompt = compose("", "What is the invoice date?");
        assert!(prompt.contains("Question: What is the invoice date?"));
    }
}
