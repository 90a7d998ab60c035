use crate::ports::outbound::SnapshotFormatter;
use crate::shared::Result;
use crate::snapshot::domain::{AppSnapshot, LogGroupRef, Section, UNKNOWN};

/// Markdown table separator for two-column property tables
const PROPERTY_HEADER: &str = "| Property | Value |\n|----------|-------|\n";

/// MarkdownFormatter adapter for a human-readable snapshot summary
///
/// Renders one property table per topology section, followed by the
/// satellite summaries and the per-section fetch times.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn percent(value: Option<f64>) -> String {
        value
            .map(|v| format!("{:.1}%", v))
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    fn property(output: &mut String, name: &str, value: &str) {
        output.push_str(&format!(
            "| {} | {} |\n",
            name,
            Self::escape_markdown_table_cell(value)
        ));
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotFormatter for MarkdownFormatter {
    fn format(&self, snapshot: &AppSnapshot) -> Result<String> {
        let mut output = String::new();

        self.render_header(&mut output, snapshot);
        self.render_source(&mut output, snapshot);
        self.render_pipeline(&mut output, snapshot);
        self.render_compute(&mut output, snapshot);
        self.render_load_balancer(&mut output, snapshot);
        self.render_data(&mut output, snapshot);
        self.render_satellites(&mut output, snapshot);
        self.render_timestamps(&mut output, snapshot);

        Ok(output)
    }
}

/// Helper methods for rendering sections
impl MarkdownFormatter {
    fn render_header(&self, output: &mut String, snapshot: &AppSnapshot) {
        output.push_str(&format!(
            "# {} ({})\n\n",
            snapshot.app_name(),
            snapshot.environment()
        ));
        output.push_str(&format!(
            "**Status:** {} · **URL:** {}\n\n",
            snapshot.status(),
            snapshot.display_url()
        ));
        output.push_str(PROPERTY_HEADER);
        Self::property(output, "Snapshot", snapshot.snapshot_id());
        Self::property(output, "Account", snapshot.account_id());
        Self::property(output, "Region", snapshot.region());
        Self::property(output, "Generated", &snapshot.generated_at().to_rfc3339());
        output.push('\n');
    }

    fn render_source(&self, output: &mut String, snapshot: &AppSnapshot) {
        let source = snapshot.source();
        output.push_str("## Source\n\n");
        output.push_str(PROPERTY_HEADER);
        Self::property(output, "Repository", &source.repository);
        Self::property(output, "Branch", &source.branch);
        Self::property(output, "Origin", &source.git_origin_url);
        Self::property(output, "Commit", &source.commit_id);
        output.push('\n');
    }

    fn render_pipeline(&self, output: &mut String, snapshot: &AppSnapshot) {
        let pipeline = &snapshot.topology().pipeline;
        output.push_str("## Pipeline\n\n");
        output.push_str(PROPERTY_HEADER);
        Self::property(output, "Name", &pipeline.name);
        Self::property(output, "Last execution", &pipeline.last_execution_id);
        Self::property(output, "Status", &pipeline.last_execution_status);
        Self::property(output, "Finished", &pipeline.last_execution_time);
        output.push('\n');
    }

    fn render_compute(&self, output: &mut String, snapshot: &AppSnapshot) {
        let compute = &snapshot.topology().compute;
        output.push_str("## Compute\n\n");
        output.push_str(PROPERTY_HEADER);
        Self::property(output, "Cluster", &compute.cluster_name);
        Self::property(output, "Service", &compute.service_name);
        Self::property(output, "Status", &compute.status);
        Self::property(
            output,
            "Tasks",
            &format!("{}/{}", compute.running_count, compute.desired_count),
        );
        Self::property(output, "Task definition", &compute.task_definition);
        Self::property(output, "Version", &compute.version);
        Self::property(output, "Health", compute.health.as_str());
        Self::property(output, "CPU", &Self::percent(compute.cpu_utilization));
        Self::property(output, "Memory", &Self::percent(compute.memory_utilization));
        output.push('\n');

        if !compute.containers.is_empty() {
            output.push_str("| Container | Image | Status |\n|-----------|-------|--------|\n");
            for container in &compute.containers {
                output.push_str(&format!(
                    "| {} | {} | {} |\n",
                    Self::escape_markdown_table_cell(&container.name),
                    Self::escape_markdown_table_cell(&container.image),
                    Self::escape_markdown_table_cell(&container.status)
                ));
            }
            output.push('\n');
        }
    }

    fn render_load_balancer(&self, output: &mut String, snapshot: &AppSnapshot) {
        let lb = &snapshot.topology().load_balancer;
        output.push_str("## Load Balancer\n\n");
        output.push_str(PROPERTY_HEADER);
        Self::property(output, "Name", &lb.name);
        Self::property(output, "DNS", &lb.dns_name);
        Self::property(output, "Listener", &format!("{} {}", lb.protocol, lb.port));
        Self::property(output, "Certificate", &lb.certificate_id);
        Self::property(output, "Certificate domain", &lb.certificate.domain_name);
        Self::property(
            output,
            "Certificate status",
            &format!("{} (expires {})", lb.certificate.status, lb.certificate.expires_at),
        );
        Self::property(output, "Target health", lb.health.as_str());
        Self::property(
            output,
            "Active connections",
            &lb.active_connections
                .map(|count| count.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string()),
        );
        output.push('\n');
    }

    fn render_data(&self, output: &mut String, snapshot: &AppSnapshot) {
        let topology = snapshot.topology();

        output.push_str("## Database\n\n");
        output.push_str(PROPERTY_HEADER);
        Self::property(output, "Identifier", &topology.database.identifier);
        Self::property(
            output,
            "Engine",
            &format!("{} {}", topology.database.engine, topology.database.engine_version),
        );
        Self::property(output, "Endpoint", &topology.database.endpoint);
        Self::property(output, "Status", &topology.database.status);
        output.push('\n');

        output.push_str("## Storage\n\n");
        if topology.storage.buckets.is_empty() {
            output.push_str("*No buckets found*\n\n");
        } else {
            for bucket in &topology.storage.buckets {
                output.push_str(&format!("- `{}`\n", bucket.url));
            }
            output.push('\n');
        }

        output.push_str("## Log Groups\n\n");
        let groups: [(&str, &[LogGroupRef]); 3] = [
            ("Compute", &topology.log_groups.compute),
            ("Load balancer", &topology.log_groups.load_balancer),
            ("Database", &topology.log_groups.database),
        ];
        for (kind, refs) in groups {
            if refs.is_empty() {
                output.push_str(&format!("- **{}:** {}\n", kind, UNKNOWN));
            }
            for group in refs {
                let errors = group
                    .error_count
                    .map(|count| count.to_string())
                    .unwrap_or_else(|| UNKNOWN.to_string());
                output.push_str(&format!(
                    "- **{}:** `{}` ({} errors in the last hour)\n",
                    kind, group.name, errors
                ));
                for entry in &group.recent {
                    output.push_str(&format!(
                        "  - [{}] {} {}\n",
                        entry.severity.as_str(),
                        entry.timestamp,
                        Self::escape_markdown_table_cell(&entry.message)
                    ));
                }
            }
        }
        output.push('\n');
    }

    fn render_satellites(&self, output: &mut String, snapshot: &AppSnapshot) {
        let satellites = snapshot.satellites();

        output.push_str("## Cost\n\n");
        output.push_str(&format!(
            "Current month: **{:.2} {}**\n\n",
            satellites.cost.current_monthly_total, satellites.cost.currency
        ));

        output.push_str("## Tickets\n\n");
        output.push_str(&format!("Open: **{}**\n\n", satellites.tickets.open));
        for ticket in &satellites.tickets.latest {
            output.push_str(&format!(
                "- {} {} ({})\n",
                ticket.key,
                Self::escape_markdown_table_cell(&ticket.summary),
                ticket.status
            ));
        }
        if !satellites.tickets.latest.is_empty() {
            output.push('\n');
        }

        output.push_str("## Security\n\n");
        output.push_str(&format!(
            "Open findings: **{}** ({} critical)\n\n",
            satellites.security.open, satellites.security.critical
        ));
        for finding in &satellites.security.latest {
            output.push_str(&format!(
                "- [{}] {}\n",
                finding.severity,
                Self::escape_markdown_table_cell(&finding.title)
            ));
        }
        if !satellites.security.latest.is_empty() {
            output.push('\n');
        }
    }

    fn render_timestamps(&self, output: &mut String, snapshot: &AppSnapshot) {
        output.push_str("## Section Freshness\n\n");
        output.push_str("| Section | Last fetched |\n|---------|--------------|\n");
        for section in Section::ALL {
            let fetched = snapshot
                .section_timestamps()
                .last_fetched(section)
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "never".to_string());
            output.push_str(&format!("| {} | {} |\n", section.key(), fetched));
        }
    }
}
