//! Command handlers dispatching CLI arguments through the tool registry.

use super::commands::{CacheCommands, Commands};
use alexandria::{
    AlexandriaConfig, AlexandriaResult, PaperTracker, ScholarClient, ToolContext, ToolRegistry,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Execute the requested command against a freshly built client.
pub async fn handle_command(config: &AlexandriaConfig, command: Commands) -> AlexandriaResult<()> {
    let client = Arc::new(ScholarClient::new(config)?);
    let tracker = Arc::new(PaperTracker::new());
    let registry = ToolRegistry::with_context(ToolContext::new(Arc::clone(&client), tracker));

    match command {
        Commands::Search {
            query,
            year,
            min_citations,
            fields_of_study,
            limit,
        } => {
            let mut input = json!({ "query": query, "limit": limit });
            if let Some(year) = year {
                input["year"] = json!(year);
            }
            if let Some(min_citations) = min_citations {
                input["min_citation_count"] = json!(min_citations);
            }
            if !fields_of_study.is_empty() {
                input["fields_of_study"] = json!(fields_of_study);
            }
            run_tool(&registry, "search_papers", input).await
        }

        Commands::Paper { paper_id, no_tldr } => {
            let input = json!({ "paper_id": paper_id, "include_tldr": !no_tldr });
            run_tool(&registry, "get_paper", input).await
        }

        Commands::Citations {
            paper_id,
            limit,
            year,
        } => {
            let mut input = json!({ "paper_id": paper_id, "limit": limit });
            if let Some(year) = year {
                input["year"] = json!(year);
            }
            run_tool(&registry, "get_paper_citations", input).await
        }

        Commands::References { paper_id, limit } => {
            let input = json!({ "paper_id": paper_id, "limit": limit });
            run_tool(&registry, "get_paper_references", input).await
        }

        Commands::Authors { query, limit } => {
            let input = json!({ "query": query, "limit": limit });
            run_tool(&registry, "search_authors", input).await
        }

        Commands::Author {
            author_id,
            no_papers,
            papers_limit,
        } => {
            let input = json!({
                "author_id": author_id,
                "include_papers": !no_papers,
                "papers_limit": papers_limit,
            });
            run_tool(&registry, "get_author", input).await
        }

        Commands::Recommend {
            paper_id,
            limit,
            pool,
        } => {
            let input = json!({ "paper_id": paper_id, "limit": limit, "from_pool": pool });
            run_tool(&registry, "get_recommendations", input).await
        }

        Commands::Related {
            paper_ids,
            negative_ids,
            limit,
        } => {
            let mut input = json!({ "positive_paper_ids": paper_ids, "limit": limit });
            if !negative_ids.is_empty() {
                input["negative_paper_ids"] = json!(negative_ids);
            }
            run_tool(&registry, "get_related_papers", input).await
        }

        Commands::Export {
            paper_ids,
            source_tool,
            include_abstract,
            no_url,
            no_doi,
            keywords,
            max_authors,
            cite_key_format,
            output,
        } => {
            let mut input = json!({
                "include_abstract": include_abstract,
                "include_url": !no_url,
                "include_doi": !no_doi,
                "include_keywords": keywords,
                "cite_key_format": cite_key_format,
            });
            if !paper_ids.is_empty() {
                input["paper_ids"] = json!(paper_ids);
            }
            if let Some(tool) = source_tool {
                input["source_tool"] = json!(tool);
            }
            if max_authors > 0 {
                input["max_authors"] = json!(max_authors);
            }
            if let Some(path) = output {
                input["file_path"] = json!(path.display().to_string());
            }
            run_tool(&registry, "export_bibtex", input).await
        }

        Commands::Cache(cache_cmd) => handle_cache_command(&client, &registry, cache_cmd).await,

        Commands::Tools => {
            let mut tools = registry.list();
            tools.sort_by(|a, b| a.name().cmp(b.name()));
            for tool in tools {
                println!("{}: {}", tool.name(), tool.description());
            }
            Ok(())
        }
    }
}

/// Handle cache maintenance commands.
async fn handle_cache_command(
    client: &ScholarClient,
    registry: &ToolRegistry,
    cmd: CacheCommands,
) -> AlexandriaResult<()> {
    match cmd {
        CacheCommands::Stats => run_tool(registry, "cache_stats", json!({})).await,

        CacheCommands::Clear => {
            client.clear_cache().await;
            println!("Response cache cleared.");
            Ok(())
        }

        CacheCommands::Invalidate { pattern } => {
            let removed = client.invalidate_cache(&pattern).await;
            println!("Invalidated {removed} cached responses matching '{pattern}'.");
            Ok(())
        }
    }
}

/// Execute a tool and print its payload.
async fn run_tool(registry: &ToolRegistry, name: &str, input: Value) -> AlexandriaResult<()> {
    let payload = registry.execute(name, input).await?;
    print_payload(&payload);
    Ok(())
}

/// Print a tool payload for human consumption.
///
/// BibTeX and plain-message payloads print as text; everything else
/// prints as pretty JSON.
fn print_payload(payload: &Value) {
    if let Some(bibtex) = payload.get("bibtex").and_then(Value::as_str) {
        println!("{bibtex}");
        return;
    }
    if let Some(message) = payload.get("message").and_then(Value::as_str) {
        println!("{message}");
        return;
    }
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    println!("{pretty}");
}
