//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::framework::NodeInfo;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// One node's endpoints for list display
#[derive(Debug, Clone)]
pub struct NodeEndpointRow {
    pub node: String,
    pub info: NodeInfo,
}

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render a plain list of names (clusters or nodes)
    pub fn render_name_list(&self, heading: &str, names: &[String]) -> String {
        if names.is_empty() {
            return format!("No {} found", heading.to_lowercase());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![Cell::new(heading).set_alignment(CellAlignment::Left)]);
        for name in names {
            table.add_row(vec![Cell::new(name)]);
        }
        table.to_string()
    }

    /// Render node endpoints as a formatted table
    pub fn render_endpoints(&self, rows: &[NodeEndpointRow]) -> String {
        if rows.is_empty() {
            return "No nodes found".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("NODE").set_alignment(CellAlignment::Left),
                Cell::new("HTTP").set_alignment(CellAlignment::Left),
                Cell::new("PROTOBUF").set_alignment(CellAlignment::Left),
                Cell::new("STATUS").set_alignment(CellAlignment::Center),
            ]);

        for row in rows {
            let icon = StatusIcon::get_node_icon(&row.info.status, row.info.alive);
            let color = self.theme.get_node_color(&row.info.status, row.info.alive);
            let status = if row.info.status.is_empty() {
                "unknown".to_string()
            } else {
                row.info.status.clone()
            };

            table.add_row(vec![
                Cell::new(&row.node),
                Cell::new(&row.info.http_direct),
                Cell::new(&row.info.pb_direct),
                Cell::new(format!("{} {}", icon, status))
                    .fg(color)
                    .set_alignment(CellAlignment::Center),
            ]);
        }
        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(status: &str, alive: bool) -> NodeInfo {
        NodeInfo {
            http_direct: "10.0.0.1:8098".into(),
            http_service_dns: "ringdb-c1.ringdb.mesos:8098".into(),
            pb_direct: "10.0.0.1:8087".into(),
            pb_service_dns: "ringdb-c1.ringdb.mesos:8087".into(),
            status: status.into(),
            alive,
        }
    }

    #[test]
    fn empty_lists_render_a_notice() {
        let renderer = TableRenderer::new();
        assert_eq!(renderer.render_name_list("Clusters", &[]), "No clusters found");
        assert_eq!(renderer.render_endpoints(&[]), "No nodes found");
    }

    #[test]
    fn endpoint_rows_carry_node_addresses_and_state() {
        let renderer = TableRenderer::new();
        let rows = vec![
            NodeEndpointRow {
                node: "c1-1".into(),
                info: info("started", true),
            },
            NodeEndpointRow {
                node: "c1-2".into(),
                info: info("starting", false),
            },
        ];
        let out = renderer.render_endpoints(&rows);
        assert!(out.contains("c1-1"));
        assert!(out.contains("10.0.0.1:8098"));
        assert!(out.contains("started"));
        assert!(out.contains("starting"));
    }

    #[test]
    fn name_lists_include_every_entry() {
        let renderer = TableRenderer::new();
        let out = renderer.render_name_list("Clusters", &["a".into(), "b".into()]);
        assert!(out.contains("a"));
        assert!(out.contains("b"));
    }
}
