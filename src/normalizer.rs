use tracing::warn;

use crate::config::{TRANSITION_FIRST_YEAR, TRANSITION_LAST_YEAR};
use crate::model::{ClubRecord, PageRequest, RawClubRow, RawGoals};

/// Stamps every raw row with its page coordinates and widens the goal block
/// to the canonical twelve slots, making all program years comparable.
pub fn normalize_all(rows: Vec<RawClubRow>, page: &PageRequest) -> Vec<ClubRecord> {
    rows.into_iter().map(|row| normalize_row(row, page)).collect()
}

fn normalize_row(row: RawClubRow, page: &PageRequest) -> ClubRecord {
    let goals = pad_goals(row.goals, &page.program_year);
    ClubRecord {
        district: page.district.clone(),
        division: row.division,
        area: row.area,
        club_number: row.club_number,
        club_name: row.club_name,
        status: row.status,
        membership_base: row.membership_base,
        active_members: row.active_members,
        goals_met: row.goals_met,
        goals,
        new_members: row.new_members,
        additional_new_members: row.additional_new_members,
        officers_trained_round1: row.officers_trained_round1,
        officers_trained_round2: row.officers_trained_round2,
        dues_on_time: row.dues_on_time,
        officer_list_on_time: row.officer_list_on_time,
        distinguished_status: row.distinguished_status,
        program_year: page.program_year.clone(),
        month: page.month.clone(),
    }
}

/// Canonical layout: traditional goals in slots 0..6, Pathways goals in
/// slots 6..12. Transitional-period rows already carry both blocks; six-goal
/// rows from after the transition hold Pathways goals, everything earlier
/// holds traditional ones. Program years compare lexicographically in
/// "YYYY-YYYY" form.
fn pad_goals(goals: RawGoals, program_year: &str) -> [u32; 12] {
    let mut canonical = [0u32; 12];
    match goals {
        RawGoals::Twelve(both) => canonical = both,
        RawGoals::Six(pathways) if program_year > TRANSITION_LAST_YEAR => {
            canonical[6..].copy_from_slice(&pathways);
        }
        RawGoals::Six(traditional) => {
            if program_year >= TRANSITION_FIRST_YEAR {
                // a six-goal page inside the dual-program window is an
                // unexpected variant; keep the traditional layout but leave
                // a trace for reprocessing
                warn!(
                    "six-goal row in transitional program year {}, assuming traditional layout",
                    program_year
                );
            }
            canonical[..6].copy_from_slice(&traditional);
        }
    }
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClubStatus;
    use crate::parser::{DashboardParser, Parser};

    fn row_with_goals(goals: RawGoals) -> RawClubRow {
        RawClubRow {
            division: "A".to_string(),
            area: "1".to_string(),
            club_number: 1234,
            club_name: "Test Club".to_string(),
            status: ClubStatus::Active,
            membership_base: 20,
            active_members: 10,
            goals_met: 3,
            goals,
            new_members: 2,
            additional_new_members: 0,
            officers_trained_round1: 7,
            officers_trained_round2: 5,
            dues_on_time: 1,
            officer_list_on_time: 2,
            distinguished_status: "D".to_string(),
        }
    }

    fn page(program_year: &str) -> PageRequest {
        PageRequest {
            program_year: program_year.to_string(),
            month: "7".to_string(),
            district: "57".to_string(),
        }
    }

    #[test]
    fn traditional_era_pads_the_tail() {
        let goals = pad_goals(RawGoals::Six([1, 2, 3, 4, 5, 6]), "2015-2016");
        assert_eq!(goals, [1, 2, 3, 4, 5, 6, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn pathways_era_pads_the_head() {
        let goals = pad_goals(RawGoals::Six([1, 2, 3, 4, 5, 6]), "2021-2022");
        assert_eq!(goals, [0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn transitional_rows_pass_through_unchanged() {
        let both = [1, 0, 1, 0, 1, 0, 0, 1, 0, 1, 0, 1];
        assert_eq!(pad_goals(RawGoals::Twelve(both), "2018-2019"), both);
        assert_eq!(pad_goals(RawGoals::Twelve(both), "2019-2020"), both);
    }

    #[test]
    fn era_boundaries_are_exclusive_of_the_window() {
        // last pre-transitional and first post-transitional years
        let six = [1, 1, 1, 1, 1, 1];
        assert_eq!(
            pad_goals(RawGoals::Six(six), "2017-2018")[..6],
            [1, 1, 1, 1, 1, 1]
        );
        assert_eq!(
            pad_goals(RawGoals::Six(six), "2020-2021")[6..],
            [1, 1, 1, 1, 1, 1]
        );
    }

    #[test]
    fn records_are_stamped_with_page_coordinates() {
        let records = normalize_all(
            vec![row_with_goals(RawGoals::Six([1, 1, 0, 0, 0, 0]))],
            &page("2022-2023"),
        );
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.district, "57");
        assert_eq!(record.program_year, "2022-2023");
        assert_eq!(record.month, "7");
        assert_eq!(record.division, "A");
        assert_eq!(record.club_number, 1234);
    }

    // end-to-end: one heading pair, one club row, post-transition year
    #[test]
    fn parse_and_normalize_single_club_page() {
        let html = r##"<html><body><table class="divisionArea_grid">
            <tbody><tr><td colspan="22">Division A Club Performance</td></tr></tbody>
            <tbody><tr><td colspan="22">Area 1 Club Performance</td></tr></tbody>
            <tbody><tr class="club_gray">
                <td class="Grid_Title_top5" title="Test Club">Test Clu</td>
                <td><span class="redFont">1234</span></td>
                <th class="Grid_Table_yellow">20</th>
                <td class="Grid_Table title_gray">10</td>
                <td><span class="goalsMetBorder">3</span></td>
                <th class="Grid_Title_goal1">1</th>
                <th class="Grid_Title_goal2">1</th>
                <th class="Grid_Title_goal3">0</th>
                <th class="Grid_Title_goal4">0</th>
                <th class="Grid_Title_goal5">0</th>
                <th class="Grid_Title_goal6">0</th>
                <th class="Grid_Title_goal7">2</th>
                <th class="Grid_Title_goal8">0</th>
                <th class="Grid_Title_goal9">7</th>
                <th class="Grid_Title_goal10">5</th>
                <th class="Grid_Title_goal11">1</th>
                <th class="Grid_Title_goal12">2</th>
                <td><img class="recog_status" src="images/d.png"></td>
            </tr></tbody>
        </table></body></html>"##;

        let parsed = DashboardParser::new().parse(html).unwrap();
        assert!(parsed.failures.is_empty());

        let records = normalize_all(parsed.rows, &page("2022-2023"));
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.division, "A");
        assert_eq!(record.area, "1");
        assert_eq!(record.club_number, 1234);
        assert_eq!(record.club_name, "Test Club");
        assert_eq!(record.status, ClubStatus::Active);
        assert_eq!(record.membership_base, 20);
        assert_eq!(record.active_members, 10);
        assert_eq!(record.goals_met, 3);
        assert_eq!(record.distinguished_status, "D");
        // post-2020 padding: traditional slots zero-filled, the six
        // extracted goals in the Pathways half
        assert_eq!(record.goals, [0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0]);
        assert_eq!(record.new_members, 2);
        assert_eq!(record.officers_trained_round1, 7);
    }
}
