//! End-to-end pipeline runs against scripted store and model

mod common;

use common::{name_rows, GroundedModel, StubStore};
use loregraph::rag::{ExecutionStatus, PipelineService, PipelineStatus, QueryExecutor, QueryOutcome};
use loregraph::{PipelineError, RagPipeline};
use std::sync::Arc;

const HOBBIT_QUERY: &str = "MATCH (c:Characters) WHERE c.Race = \"Hobbit\" RETURN c.Name AS Name";

#[tokio::test]
async fn test_hobbit_question_answers_only_from_returned_rows() {
    let store = StubStore::with_rows(name_rows(&["Frodo", "Sam"]));
    let model = GroundedModel::new(&format!("```cypher\n{}\n```", HOBBIT_QUERY));
    let pipeline = RagPipeline::new(store.clone(), model.clone(), false);

    let response = pipeline.ask("List all characters who are Hobbits").await.unwrap();

    assert_eq!(response.generated_query, HOBBIT_QUERY);
    assert_eq!(store.queries.lock().unwrap().as_slice(), &[HOBBIT_QUERY.to_string()]);

    let synthesis_prompt = model.last_prompt().unwrap();
    assert!(synthesis_prompt.contains(r#"[{"Name":"Frodo"},{"Name":"Sam"}]"#));
    assert!(synthesis_prompt.contains("Question: List all characters who are Hobbits"));

    assert!(response.answer.contains("Frodo"));
    assert!(response.answer.contains("Sam"));
    for absent in ["Merry", "Pippin", "Bilbo"] {
        assert!(!response.answer.contains(absent));
    }

    assert_eq!(response.execution.status, ExecutionStatus::Rows);
    assert_eq!(response.execution.row_count, 2);
}

#[tokio::test]
async fn test_empty_result_uses_sentinel_context() {
    let store = StubStore::with_rows(Vec::new());
    let model = GroundedModel::new("MATCH (c:Characters) WHERE c.Race = \"Balrog\" RETURN c.Name AS Name");
    let pipeline = RagPipeline::new(store, model.clone(), false);

    let response = pipeline.ask("Which Balrogs appear in the films?").await.unwrap();

    let synthesis_prompt = model.last_prompt().unwrap();
    assert!(synthesis_prompt.contains(&format!("{}No data found in the graph.", common::CONTEXT_MARKER)));
    assert!(!synthesis_prompt.contains("[]"));
    assert!(response.answer.contains("No matching records"));
    assert_eq!(response.execution.status, ExecutionStatus::Empty);
    assert_eq!(response.execution.row_count, 0);
}

#[tokio::test]
async fn test_rejected_query_is_reported_to_synthesis_in_lenient_mode() {
    let store = StubStore::rejecting("Invalid input 'RETRUN'");
    let model = GroundedModel::new("MATCH (c:Characters) RETRUN c");
    let pipeline = RagPipeline::new(store, model.clone(), false);

    let response = pipeline.ask("Who are the Elves?").await.unwrap();

    let synthesis_prompt = model.last_prompt().unwrap();
    assert!(synthesis_prompt.contains("Error executing Cypher query: Invalid input 'RETRUN'"));
    assert!(!synthesis_prompt.contains("No data found in the graph."));
    assert_eq!(response.execution.status, ExecutionStatus::Failed);
}

#[tokio::test]
async fn test_rejected_query_fails_request_in_strict_mode() {
    let store = StubStore::rejecting("Invalid input 'RETRUN'");
    let model = GroundedModel::new("MATCH (c:Characters) RETRUN c");
    let pipeline = RagPipeline::new(store, model.clone(), true);

    let err = pipeline.ask("Who are the Elves?").await.unwrap_err();

    assert!(matches!(err, PipelineError::Execution(_)));
    // Translation only; synthesis never runs
    assert_eq!(model.prompt_count(), 1);
}

#[tokio::test]
async fn test_translation_failure_skips_store() {
    let store = StubStore::with_rows(name_rows(&["Gandalf"]));
    let model = GroundedModel::failing();
    let pipeline = RagPipeline::new(store.clone(), model, false);

    let err = pipeline.ask("Who is the grey wizard?").await.unwrap_err();

    assert!(matches!(err, PipelineError::Translation(_)));
    assert_eq!(store.query_count(), 0);
}

#[tokio::test]
async fn test_translation_is_reproducible() {
    let store = StubStore::with_rows(name_rows(&["Legolas"]));
    let model = GroundedModel::new("MATCH (c:Characters {Race: \"Elf\"}) RETURN c.Name AS Name");
    let pipeline = RagPipeline::new(store, model.clone(), false);

    let first = pipeline.ask("Which characters are Elves?").await.unwrap();
    let second = pipeline.ask("Which characters are Elves?").await.unwrap();

    assert_eq!(first.generated_query, second.generated_query);
    let prompts = model.prompts.lock().unwrap();
    // translate, synthesize, translate, synthesize
    assert_eq!(prompts.len(), 4);
    assert_eq!(prompts[0], prompts[2]);
}

#[tokio::test]
async fn test_executor_preserves_row_order() {
    let store = StubStore::with_rows(name_rows(&["Aragorn", "Boromir", "Gimli"]));
    let executor = QueryExecutor::new(store);

    match executor.execute("MATCH (c:Characters) RETURN c.Name AS Name").await.unwrap() {
        QueryOutcome::Rows(rows) => {
            let names: Vec<_> = rows.iter().map(|r| r["Name"].as_str().unwrap()).collect();
            assert_eq!(names, vec!["Aragorn", "Boromir", "Gimli"]);
        }
        QueryOutcome::Empty => panic!("expected rows"),
    }
}

#[tokio::test]
async fn test_service_reset_recovers_from_degraded() {
    let store = StubStore::with_rows(name_rows(&["Frodo"]));
    let model = GroundedModel::new(HOBBIT_QUERY);
    let bootstrap = common::TestBootstrap::new(store, model, false);
    let service = PipelineService::new(bootstrap.clone(), false);

    assert!(service.initialize().await.is_err());
    assert_eq!(service.status().await, PipelineStatus::Degraded);
    assert!(matches!(
        service.ask("Who carries the Ring?").await,
        Err(PipelineError::NotReady { initialization_error: Some(_) })
    ));

    bootstrap.fix_configuration();
    service.initialize().await.unwrap();

    assert_eq!(service.status().await, PipelineStatus::Ready);
    assert!(service.health().await.initialization_error.is_none());
    let response = service.ask("Who carries the Ring?").await.unwrap();
    assert!(response.answer.contains("Frodo"));
}

#[tokio::test]
async fn test_stats_through_service() {
    let service = common::ready_service(StubStore::with_rows(Vec::new()), GroundedModel::new(HOBBIT_QUERY)).await;

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.total_nodes, 2515);
    assert_eq!(stats.total_characters, 847);
    assert_eq!(stats.total_movies, 3);
    assert_eq!(stats.total_relationships, 5120);
}

#[tokio::test]
async fn test_concurrent_questions_share_one_pipeline() {
    let store = StubStore::with_rows(name_rows(&["Frodo", "Sam"]));
    let service = common::ready_service(store.clone(), GroundedModel::new(HOBBIT_QUERY)).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.ask("List all characters who are Hobbits").await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.execution.row_count, 2);
    }
    assert_eq!(store.query_count(), 8);
}
