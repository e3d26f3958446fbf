//! Prompt templates
//!
//! The schema block and few-shot pairs are fixed for the Lord of the Rings
//! graph and are embedded verbatim in every translation prompt.

/// Node labels, relationship types and key properties of the graph
pub const SCHEMA_DESCRIPTION: &str = "\
You are an expert in Neo4j Cypher queries. The graph contains nodes labeled Movies, Characters, Chapters, and Scripts, with relationships like ACTED_IN, APPEAR_IN, SPLIT_IN, USE_IN, and SPOKE_IN.
Node properties include:
- Movies: Name (e.g., \"The Fellowship Of The Ring\")
- Characters: Name, Race (e.g., \"Galadriel\", \"Elf\")
Use partial matches for movie titles (e.g., CONTAINS \"Fellowship Of The Ring\" or \"Two Towers\") unless an exact title is specified.";

/// Canonical question → Cypher pairs
pub const FEW_SHOT_EXAMPLES: &[(&str, &str)] = &[
    (
        "Which characters are in Lord of the Rings movies?",
        "MATCH (c:Characters)-[:ACTED_IN]->(m:Movies) WHERE m.Name CONTAINS \"Of The Ring\" OR m.Name CONTAINS \"Two Towers\" OR m.Name CONTAINS \"Return Of The King\" RETURN c.Name, m.Name",
    ),
    (
        "How many hobbits are in Lord of the Rings?",
        "MATCH (c:Characters)-[:ACTED_IN]->(m:Movies) WHERE c.Race = \"Hobbit\" AND (m.Name CONTAINS \"Of The Ring\" OR m.Name CONTAINS \"Two Towers\" OR m.Name CONTAINS \"Return Of The King\") RETURN count(DISTINCT c)",
    ),
];

pub fn cypher_prompt(question: &str) -> String {
    let mut prompt = String::with_capacity(SCHEMA_DESCRIPTION.len() + 1024);
    prompt.push_str(SCHEMA_DESCRIPTION);
    prompt.push_str("\nBased on the following question, generate a valid Cypher query to retrieve relevant data.\nExamples:\n");
    for (q, cypher) in FEW_SHOT_EXAMPLES {
        prompt.push_str(&format!("Question: \"{}\"\nCypher: {}\n", q, cypher));
    }
    prompt.push_str(&format!("Question: {}\nOutput only the Cypher query.\n", question));
    prompt
}

pub fn answer_prompt(question: &str, context: &str) -> String {
    format!(
        "You are an assistant that answers questions based on a Lord of the Rings knowledge graph.

Question: {question}
Data retrieved from the graph (already filtered by the Cypher query): {context}

The data above was retrieved using a Cypher query that already filtered the results based on the question.
If the data contains character names, they have already been filtered according to the search criteria.

Answer the question directly based on this filtered data. If there are multiple results, list them clearly.
If the data is empty, explain that no matching records were found in the graph.
"
    )
}
