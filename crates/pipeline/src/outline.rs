use crate::reader::RawRow;

/// Structure level opening a new top-level activity.
pub const LEVEL_ACTIVITY: &str = "3";
/// Structure level of a potential sub-activity.
pub const LEVEL_SUB_ACTIVITY: &str = "4";

/// A flagged level-4 row attached to the activity above it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineSub {
    pub name: String,
    pub planned: f64,
    pub real: f64,
}

/// A level-3 activity with its flagged sub-rows. Sub-activities never nest
/// further; the outline is at most two levels deep.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineNode {
    pub name: String,
    pub planned: f64,
    pub real: f64,
    pub sub_activities: Vec<OutlineSub>,
}

/// What the grouper silently dropped, surfaced so callers can log it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupingCounts {
    /// Rows ignored for having an empty name.
    pub unnamed_rows: usize,
    /// Level-3 activities discarded for having no flagged sub-rows.
    pub childless_dropped: usize,
}

/// Parse a locale-formatted percentage: decimal comma, defaulting to zero.
///
/// Non-numeric, missing and negative values all parse to `0.0`; the derived
/// field layer assumes non-negative input and does not re-validate.
#[must_use]
pub fn parse_decimal(raw: &str) -> f64 {
    let cleaned = raw.trim().replacen(',', ".", 1);
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Fold the row sequence into two-level outline nodes.
///
/// A level-3 row closes the currently open node (emitting it only when it
/// accumulated at least one sub-activity) and opens a new one; a flagged
/// level-4 row appends to the open node; everything else is ignored.
pub fn group_rows(rows: &[RawRow]) -> (Vec<OutlineNode>, GroupingCounts) {
    let mut activities = Vec::new();
    let mut counts = GroupingCounts::default();
    let mut current: Option<OutlineNode> = None;

    for row in rows {
        let name = row.name();
        if name.is_empty() {
            counts.unnamed_rows += 1;
            continue;
        }
        match row.level() {
            LEVEL_ACTIVITY => {
                close_current(&mut current, &mut activities, &mut counts);
                current = Some(OutlineNode {
                    name: name.to_string(),
                    planned: parse_decimal(row.percent_planned()),
                    real: parse_decimal(row.percent_real()),
                    sub_activities: Vec::new(),
                });
            }
            LEVEL_SUB_ACTIVITY if row.dashboard_flagged() => {
                if let Some(node) = current.as_mut() {
                    node.sub_activities.push(OutlineSub {
                        name: name.to_string(),
                        planned: parse_decimal(row.percent_planned()),
                        real: parse_decimal(row.percent_real()),
                    });
                }
            }
            _ => {}
        }
    }
    close_current(&mut current, &mut activities, &mut counts);

    (activities, counts)
}

fn close_current(
    current: &mut Option<OutlineNode>,
    out: &mut Vec<OutlineNode>,
    counts: &mut GroupingCounts,
) {
    if let Some(node) = current.take() {
        if node.sub_activities.is_empty() {
            counts.childless_dropped += 1;
            log::debug!("dropping activity without flagged sub-rows: {}", node.name);
        } else {
            out.push(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_rows;
    use pretty_assertions::assert_eq;

    const HEADER: &str =
        "Nome;Nível_da_estrutura_de_tópicos;Dashboard;Porcentagem_Prev_Real;Porcentagem_Prev_LB";

    fn group(body: &str) -> (Vec<OutlineNode>, GroupingCounts) {
        let text = format!("{HEADER}\n{body}");
        let outcome = parse_rows(&text).unwrap();
        group_rows(&outcome.rows)
    }

    #[test]
    fn test_parse_decimal_table() {
        assert_eq!(parse_decimal("50,0"), 50.0);
        assert_eq!(parse_decimal("80.5"), 80.5);
        assert_eq!(parse_decimal(" 12,25 "), 12.25);
        assert_eq!(parse_decimal(""), 0.0);
        assert_eq!(parse_decimal("n/a"), 0.0);
        assert_eq!(parse_decimal("-3,0"), 0.0);
    }

    #[test]
    fn test_groups_activity_with_flagged_subs() {
        let (nodes, counts) = group(
            "Forno;3;;50,0;80,0\n\
             Sub A;4;S;40,0;80,0\n\
             Sub B;4;N;10,0;10,0\n\
             Sub C;4;S;70,0;80,0\n",
        );
        assert_eq!(nodes.len(), 1);
        let node = &nodes[0];
        assert_eq!(node.name, "Forno");
        assert_eq!(node.planned, 80.0);
        assert_eq!(node.real, 50.0);
        // Sub B lacks the dashboard flag
        assert_eq!(node.sub_activities.len(), 2);
        assert_eq!(node.sub_activities[0].name, "Sub A");
        assert_eq!(node.sub_activities[1].name, "Sub C");
        assert_eq!(counts.childless_dropped, 0);
    }

    #[test]
    fn test_childless_activity_is_dropped() {
        let (nodes, counts) = group(
            "Lonely;3;;10,0;10,0\n\
             Forno;3;;50,0;80,0\n\
             Sub A;4;S;40,0;80,0\n",
        );
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name, "Forno");
        assert_eq!(counts.childless_dropped, 1);
    }

    #[test]
    fn test_trailing_open_activity_is_flushed() {
        let (nodes, _) = group(
            "Forno;3;;50,0;80,0\n\
             Sub A;4;S;40,0;80,0\n\
             Secagem;3;;20,0;40,0\n\
             Sub B;4;S;20,0;40,0\n",
        );
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].name, "Secagem");
    }

    #[test]
    fn test_sub_row_before_any_activity_is_ignored() {
        let (nodes, _) = group("Orphan;4;S;10,0;10,0\n");
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_unnamed_rows_are_counted() {
        let (nodes, counts) = group(
            ";3;;50,0;80,0\n\
             Forno;3;;50,0;80,0\n\
             Sub A;4;S;40,0;80,0\n",
        );
        assert_eq!(nodes.len(), 1);
        assert_eq!(counts.unnamed_rows, 1);
    }

    #[test]
    fn test_other_levels_are_ignored() {
        let (nodes, counts) = group(
            "Projeto;1;;90,0;90,0\n\
             Frente;2;S;90,0;90,0\n\
             Forno;3;;50,0;80,0\n\
             Sub A;4;S;40,0;80,0\n",
        );
        assert_eq!(nodes.len(), 1);
        assert_eq!(counts.unnamed_rows, 0);
    }

    #[test]
    fn test_unparseable_percentages_default_to_zero() {
        let (nodes, _) = group(
            "Forno;3;;abc;\n\
             Sub A;4;S;40,0;80,0\n",
        );
        assert_eq!(nodes[0].real, 0.0);
        assert_eq!(nodes[0].planned, 0.0);
    }
}
