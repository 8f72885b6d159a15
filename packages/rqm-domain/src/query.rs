/// Marker appended to each token so the text index matches it as a prefix.
pub const PREFIX_MATCH_MARKER: &str = ":*";
/// Conjunction placed between prefix-matched tokens.
pub const AND_OPERATOR: &str = " & ";

/// Turns free text into the conjunctive prefix-match expression evaluated by the text index.
///
/// `"payment  gate"` becomes `"payment:* & gate:*"`. Blank input yields an empty expression. The
/// result is bound as a query parameter by the store, never spliced into SQL.
pub fn prepare_query(query: &str) -> String {
	let tokens: Vec<String> = query
		.split_whitespace()
		.map(|token| format!("{token}{PREFIX_MATCH_MARKER}"))
		.collect();

	tokens.join(AND_OPERATOR)
}
