use rusqlite::{params, Connection, Row};

use crate::model::{ClubRecord, ClubStatus, StoreError};

/// Relational sink: one row per club per district per month per program
/// year, upserted on the natural key.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn new(db_path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS club_performance (
                district             TEXT NOT NULL,
                division             TEXT NOT NULL,
                area                 TEXT NOT NULL,
                club_number          INTEGER NOT NULL,
                club_name            TEXT NOT NULL,
                club_status          TEXT NOT NULL,
                membership_base      INTEGER NOT NULL,
                active_members       INTEGER NOT NULL,
                goals_met            INTEGER NOT NULL,
                ccs                  INTEGER NOT NULL,
                add_ccs              INTEGER NOT NULL,
                acs                  INTEGER NOT NULL,
                add_acs              INTEGER NOT NULL,
                cl_al_dtms           INTEGER NOT NULL,
                add_cl_al_dtms       INTEGER NOT NULL,
                level1s              INTEGER NOT NULL,
                level2s              INTEGER NOT NULL,
                add_level2s          INTEGER NOT NULL,
                level3s              INTEGER NOT NULL,
                level4s              INTEGER NOT NULL,
                level5s              INTEGER NOT NULL,
                new_members          INTEGER NOT NULL,
                add_new_members      INTEGER NOT NULL,
                off_trained_r1       INTEGER NOT NULL,
                off_trained_r2       INTEGER NOT NULL,
                dues_on_time         INTEGER NOT NULL,
                officer_list_on_time INTEGER NOT NULL,
                distinguished_status TEXT NOT NULL,
                program_year         TEXT NOT NULL,
                month                TEXT NOT NULL,
                PRIMARY KEY (district, club_number, program_year, month)
            );
            ",
        )?;

        Ok(Self { conn })
    }

    /// Inserts or replaces one record keyed on
    /// (district, club_number, program_year, month).
    pub fn save_record(&self, record: &ClubRecord) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO club_performance (
                district, division, area, club_number, club_name, club_status,
                membership_base, active_members, goals_met,
                ccs, add_ccs, acs, add_acs, cl_al_dtms, add_cl_al_dtms,
                level1s, level2s, add_level2s, level3s, level4s, level5s,
                new_members, add_new_members, off_trained_r1, off_trained_r2,
                dues_on_time, officer_list_on_time, distinguished_status,
                program_year, month
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                    ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20,
                    ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30)",
            params![
                &record.district,
                &record.division,
                &record.area,
                &record.club_number,
                &record.club_name,
                record.status.to_string(),
                &record.membership_base,
                &record.active_members,
                &record.goals_met,
                &record.goals[0],
                &record.goals[1],
                &record.goals[2],
                &record.goals[3],
                &record.goals[4],
                &record.goals[5],
                &record.goals[6],
                &record.goals[7],
                &record.goals[8],
                &record.goals[9],
                &record.goals[10],
                &record.goals[11],
                &record.new_members,
                &record.additional_new_members,
                &record.officers_trained_round1,
                &record.officers_trained_round2,
                &record.dues_on_time,
                &record.officer_list_on_time,
                &record.distinguished_status,
                &record.program_year,
                &record.month,
            ],
        )?;
        Ok(())
    }

    /// Saves a page worth of records in one transaction.
    pub fn save_all(&mut self, records: &[ClubRecord]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO club_performance (
                    district, division, area, club_number, club_name, club_status,
                    membership_base, active_members, goals_met,
                    ccs, add_ccs, acs, add_acs, cl_al_dtms, add_cl_al_dtms,
                    level1s, level2s, add_level2s, level3s, level4s, level5s,
                    new_members, add_new_members, off_trained_r1, off_trained_r2,
                    dues_on_time, officer_list_on_time, distinguished_status,
                    program_year, month
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                        ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20,
                        ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30)",
            )?;
            for record in records {
                stmt.execute(params![
                    &record.district,
                    &record.division,
                    &record.area,
                    &record.club_number,
                    &record.club_name,
                    record.status.to_string(),
                    &record.membership_base,
                    &record.active_members,
                    &record.goals_met,
                    &record.goals[0],
                    &record.goals[1],
                    &record.goals[2],
                    &record.goals[3],
                    &record.goals[4],
                    &record.goals[5],
                    &record.goals[6],
                    &record.goals[7],
                    &record.goals[8],
                    &record.goals[9],
                    &record.goals[10],
                    &record.goals[11],
                    &record.new_members,
                    &record.additional_new_members,
                    &record.officers_trained_round1,
                    &record.officers_trained_round2,
                    &record.dues_on_time,
                    &record.officer_list_on_time,
                    &record.distinguished_status,
                    &record.program_year,
                    &record.month,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn record_count(&self) -> Result<u64, StoreError> {
        let count: u64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM club_performance", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn get_record(
        &self,
        district: &str,
        club_number: u32,
        program_year: &str,
        month: &str,
    ) -> Result<Option<ClubRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT district, division, area, club_number, club_name, club_status,
                    membership_base, active_members, goals_met,
                    ccs, add_ccs, acs, add_acs, cl_al_dtms, add_cl_al_dtms,
                    level1s, level2s, add_level2s, level3s, level4s, level5s,
                    new_members, add_new_members, off_trained_r1, off_trained_r2,
                    dues_on_time, officer_list_on_time, distinguished_status,
                    program_year, month
             FROM club_performance
             WHERE district = ?1 AND club_number = ?2 AND program_year = ?3 AND month = ?4",
        )?;

        let mut rows = stmt.query(params![district, club_number, program_year, month])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::map_record(row)?))
        } else {
            Ok(None)
        }
    }

    fn map_record(row: &Row) -> Result<ClubRecord, rusqlite::Error> {
        let mut goals = [0u32; 12];
        for (i, slot) in goals.iter_mut().enumerate() {
            *slot = row.get(9 + i)?;
        }
        let status_text: String = row.get(5)?;

        Ok(ClubRecord {
            district: row.get(0)?,
            division: row.get(1)?,
            area: row.get(2)?,
            club_number: row.get(3)?,
            club_name: row.get(4)?,
            status: status_from_text(&status_text),
            membership_base: row.get(6)?,
            active_members: row.get(7)?,
            goals_met: row.get(8)?,
            goals,
            new_members: row.get(21)?,
            additional_new_members: row.get(22)?,
            officers_trained_round1: row.get(23)?,
            officers_trained_round2: row.get(24)?,
            dues_on_time: row.get(25)?,
            officer_list_on_time: row.get(26)?,
            distinguished_status: row.get(27)?,
            program_year: row.get(28)?,
            month: row.get(29)?,
        })
    }
}

fn status_from_text(text: &str) -> ClubStatus {
    match text {
        "Active" => ClubStatus::Active,
        "Low" => ClubStatus::Low,
        "Ineligible" => ClubStatus::Ineligible,
        other => ClubStatus::Suspended(
            other.strip_prefix("Suspended ").unwrap_or(other).to_string(),
        ),
    }
}
