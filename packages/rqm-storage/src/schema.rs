pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_requirement_types.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_requirement_types.sql")),
				"tables/002_epics.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_epics.sql")),
				"tables/003_user_stories.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_user_stories.sql")),
				"tables/004_acceptance_criteria.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_acceptance_criteria.sql")),
				"tables/005_requirements.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_requirements.sql")),
				"tables/006_search_cache.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_search_cache.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	#[test]
	fn includes_are_expanded() {
		let sql = super::render_schema();

		assert!(!sql.contains("\\ir "));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS search_cache"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS acceptance_criteria"));
	}
}
