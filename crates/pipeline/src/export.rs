use epu_domain::Project;

/// Column set of the legacy export format.
pub const EXPORT_HEADER: [&str; 7] = [
    "Nome",
    "Tipo",
    "Planejado",
    "Real",
    "Progresso",
    "Status",
    "Subatividades",
];

/// Flatten a persisted project into export rows, header first.
///
/// One row per activity in phase order; sub-activities are folded into the
/// last column using the legacy `name:real|planned` encoding, joined with
/// semicolons.
#[must_use]
pub fn export_rows(project: &Project) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(1 + project.activities().count());
    rows.push(EXPORT_HEADER.iter().map(|s| (*s).to_string()).collect());

    for activity in project.activities() {
        let sub_activities = activity
            .sub_activities
            .iter()
            .map(|sub| format!("{}:{}|{}", sub.name, sub.real, sub.planned))
            .collect::<Vec<_>>()
            .join(";");

        rows.push(vec![
            activity.name.clone(),
            activity.phase.as_str().to_string(),
            activity.planned.to_string(),
            activity.real.to_string(),
            activity.progress.to_string(),
            activity.status.as_str().to_string(),
            sub_activities,
        ]);
    }

    rows
}

/// Compose the final CSV text: every field double-quoted, comma-joined.
///
/// The quoting is deliberate pipeline behavior (the legacy consumer expects
/// every field quoted), so it is composed here rather than delegated to a
/// writer library.
#[must_use]
pub fn to_csv_text(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|field| quote(field))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
