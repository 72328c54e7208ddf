//! Command implementations. Each returns the text to print.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use tablekit::{
    FilterRegistry, QuickFilterValue, QuickFilterValues, SortSpec, SortingEntry, TableQuery,
    TableQueryOptions, TableView,
};

use crate::cli::{FiltersArgs, OutputFormat, QueryArgs};

pub fn run_filters(args: &FiltersArgs) -> Result<String> {
    let registry = load_registry(&args.registry)?;
    let defs = registry.get_filters(&args.table);
    if defs.is_empty() {
        bail!(
            "no filters configured for table '{}' (known tables: {})",
            args.table,
            registry.table_ids().collect::<Vec<_>>().join(", ")
        );
    }
    Ok(serde_json::to_string_pretty(defs)?)
}

pub fn run_query(args: &QueryArgs) -> Result<String> {
    let registry = load_registry(&args.registry)?;
    let mut table = TableQuery::new(Arc::new(registry), build_options(args)?);

    if let Some(path) = &args.view {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading view {}", path.display()))?;
        let view = TableView::from_json(&json)
            .with_context(|| format!("decoding view {}", path.display()))?;
        info!(view_id = %view.id, "Applying saved view");
        table.apply_view(&view);
    }
    if !args.filters.is_empty() {
        table.on_global_filters_change(parse_quick_filters(&args.filters)?);
        for dropped in table.quick_filter_diagnostics() {
            warn!(column = %dropped.column, reason = %dropped.reason, "Quick filter dropped");
        }
    }
    if let Some(search) = &args.search {
        table.on_search_change(search.as_str());
    }
    if let Some(sort) = &args.sort {
        let spec: SortSpec = sort.parse()?;
        table.on_sorting_change(&[SortingEntry::from(&spec)]);
    }
    if let Some(size) = args.page_size {
        table.on_page_size_change(size);
    }
    if let Some(page) = args.page {
        table.on_page_change(page);
    }

    let query = table.query();
    match args.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&query)?),
        OutputFormat::Pairs => Ok(query
            .to_pairs()?
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn load_registry(path: &Path) -> Result<FilterRegistry> {
    FilterRegistry::from_path(path).with_context(|| format!("loading registry {}", path.display()))
}

fn build_options(args: &QueryArgs) -> Result<TableQueryOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading options {}", path.display()))?;
            let mut options = TableQueryOptions::from_yaml(&text)
                .with_context(|| format!("decoding options {}", path.display()))?;
            options.table_id = args.table.clone();
            options
        }
        None => TableQueryOptions::new(&args.table),
    };
    if let Some(columns) = &args.whitelist {
        options = options.with_sort_whitelist(columns.iter().map(|c| c.trim()));
    }
    Ok(options)
}

/// Parses `column=value` arguments. A repeated column becomes a list.
fn parse_quick_filters(raw: &[String]) -> Result<QuickFilterValues> {
    let mut values = QuickFilterValues::new();
    for arg in raw {
        let Some((column, value)) = arg.split_once('=') else {
            bail!("invalid filter '{arg}', expected COLUMN=VALUE");
        };
        let column = column.trim();
        if column.is_empty() {
            bail!("invalid filter '{arg}', column is empty");
        }
        let parsed: QuickFilterValue = value
            .parse()
            .with_context(|| format!("invalid filter value in '{arg}'"))?;
        let merged = match values.remove(column) {
            None => parsed,
            Some(previous) => {
                let mut items = previous.encode();
                items.extend(parsed.encode());
                QuickFilterValue::Multi(items)
            }
        };
        values.insert(column, merged);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tablekit::Operator;
    use std::path::PathBuf;

    const REGISTRY: &str = r#"
projects:
  - columnKey: status
    label: Status
    filterType: select
  - columnKey: budget
    label: Budget
    filterType: number
  - columnKey: createdOn
    label: Created
    filterType: daterange
"#;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn query_args(registry: PathBuf) -> QueryArgs {
        QueryArgs {
            registry,
            table: "projects".into(),
            options: None,
            filters: vec![],
            search: None,
            page: None,
            page_size: None,
            sort: None,
            whitelist: None,
            view: None,
            format: OutputFormat::Pairs,
        }
    }

    #[test]
    fn filters_prints_definitions() {
        let dir = tempfile::tempdir().unwrap();
        let registry = write(&dir, "registry.yaml", REGISTRY);
        let out = run_filters(&FiltersArgs {
            registry,
            table: "projects".into(),
        })
        .unwrap();
        let defs: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(defs[0]["columnKey"], "status");
        assert_eq!(defs.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn filters_unknown_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        let registry = write(&dir, "registry.yaml", REGISTRY);
        let err = run_filters(&FiltersArgs {
            registry,
            table: "ghost".into(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("known tables: projects"));
    }

    #[test]
    fn query_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = query_args(write(&dir, "registry.yaml", REGISTRY));
        args.filters = vec!["status=active".into(), "budget=gte:100".into()];
        args.search = Some("acme".into());
        args.page = Some(2);

        let out = run_query(&args).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "page=2",
                "pageSize=25",
                "search=acme",
                "sortBy=createdOnTimestamp",
                "sortOrder=desc",
                r#"filters=[{"field":"status","operator":"equals","value":"active"},{"field":"budget","operator":"gte","value":100}]"#,
                "filterMode=all",
            ]
        );
    }

    #[test]
    fn query_applies_view_then_quick_filters() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = query_args(write(&dir, "registry.json", r#"{"projects": [
            {"columnKey": "status", "label": "Status", "filterType": "select"}
        ]}"#));
        args.view = Some(write(
            &dir,
            "view.json",
            r#"{"id": "v", "name": "Mine",
                "filters": [{"field": "owner", "operator": "equals", "value": "bob"}],
                "metadata": {"filterMode": "any"}}"#,
        ));
        args.filters = vec!["status=active".into(), "status=paused".into()];
        args.format = OutputFormat::Json;

        let query: serde_json::Value = serde_json::from_str(&run_query(&args).unwrap()).unwrap();
        assert_eq!(query["filterMode"], "any");
        assert_eq!(query["filters"][0]["field"], "owner");
        assert_eq!(query["filters"][1]["operator"], "in");
        assert_eq!(query["filters"][1]["value"], serde_json::json!(["active", "paused"]));
    }

    #[test]
    fn query_respects_whitelist() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = query_args(write(&dir, "registry.yaml", REGISTRY));
        args.whitelist = Some(vec!["name".into()]);
        args.sort = Some("secret:asc".into());

        let out = run_query(&args).unwrap();
        assert!(out.contains("sortBy=createdOnTimestamp"));

        args.sort = Some("name:asc".into());
        let out = run_query(&args).unwrap();
        assert!(out.contains("sortBy=name"));
        assert!(out.contains("sortOrder=asc"));
    }

    #[test]
    fn query_reads_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = query_args(write(&dir, "registry.yaml", REGISTRY));
        args.options = Some(write(
            &dir,
            "options.yaml",
            "tableId: other\npageSize: 50\ninitialSort: { sortBy: name, sortOrder: asc }\n",
        ));
        args.filters = vec!["status=active".into()];

        let out = run_query(&args).unwrap();
        assert!(out.contains("pageSize=50"));
        assert!(out.contains("sortBy=name"));
        assert!(out.contains(r#""field":"status""#));
    }

    #[test]
    fn quick_filter_parsing() {
        let values = parse_quick_filters(&[
            "tags=a".into(),
            "tags=b".into(),
            "tags=c".into(),
            "created=2024-01-01|".into(),
        ])
        .unwrap();
        assert_eq!(values.get("tags"), Some(&QuickFilterValue::multi(["a", "b", "c"])));
        assert_eq!(values.get("created"), Some(&QuickFilterValue::date_range("2024-01-01", "")));

        let values = parse_quick_filters(&["budget=gte:100".into(), "status=isNull:".into()]).unwrap();
        assert_eq!(values.get("budget"), Some(&QuickFilterValue::prefixed(Operator::Gte, "100")));
        assert_eq!(values.get("status"), Some(&QuickFilterValue::prefixed(Operator::IsNull, "")));

        let err = parse_quick_filters(&["status=bigger:1".into()]).unwrap_err();
        assert!(format!("{err:#}").contains("unknown operator"));
        assert!(parse_quick_filters(&["created=a|b|c".into()]).is_err());

        assert!(parse_quick_filters(&["novalue".into()]).is_err());
        assert!(parse_quick_filters(&["=x".into()]).is_err());
    }

    #[test]
    fn missing_registry_reports_path() {
        let args = query_args(PathBuf::from("/nonexistent/registry.yaml"));
        let err = run_query(&args).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/registry.yaml"));
    }
}
