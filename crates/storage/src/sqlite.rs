use std::path::Path;

use log::{debug, info};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OptionalExtension, Row, params, types::Type};

use repcycle_domain::{
    CatalogRepository, Exercise, Muscle, Property, ReadError, Reps, Sets, StorageError, Title,
    WriteError, distinct,
};

use crate::{CatalogWriter, storage_error};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS workouts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT,
        workout_description TEXT,
        physique_goal TEXT,
        target_muscle TEXT,
        experience_level TEXT,
        reps INTEGER DEFAULT 10,
        sets INTEGER DEFAULT 3,
        timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE TABLE IF NOT EXISTS muscles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        muscle_name TEXT UNIQUE
    );
    CREATE TABLE IF NOT EXISTS workout_muscle_map (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        workout_id INTEGER,
        muscle_id INTEGER,
        FOREIGN KEY (workout_id) REFERENCES workouts(id) ON DELETE CASCADE,
        FOREIGN KEY (muscle_id) REFERENCES muscles(id) ON DELETE CASCADE
    );
";

const SELECT_EXERCISES: &str = "
    SELECT w.title, w.workout_description, w.reps, w.sets
    FROM workouts w
    WHERE w.id IN (
        SELECT wm.workout_id
        FROM workout_muscle_map wm
        JOIN muscles m ON wm.muscle_id = m.id
        WHERE m.muscle_name = ?1
    )
    ORDER BY w.id
";

/// Exercise catalog stored in an SQLite database.
pub struct Catalog {
    pool: Pool<SqliteConnectionManager>,
}

impl Catalog {
    /// Opens the database at `path`, creating the tables if they do not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        info!("opening catalog {}", path.as_ref().display());
        Self::build(SqliteConnectionManager::file(path), 4)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        // Every connection to an in-memory database sees its own database.
        Self::build(SqliteConnectionManager::memory(), 1)
    }

    fn build(manager: SqliteConnectionManager, max_size: u32) -> Result<Self, StorageError> {
        let manager = manager.with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder()
            .max_size(max_size)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)
            .map_err(storage_error)?;
        let catalog = Self { pool };
        catalog
            .connection()?
            .execute_batch(SCHEMA)
            .map_err(storage_error)?;
        Ok(catalog)
    }

    fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, StorageError> {
        self.pool.get().map_err(|err| {
            debug!("failed to get database connection: {err}");
            StorageError::NoConnection
        })
    }

    fn row_to_exercise(row: &Row) -> rusqlite::Result<Exercise> {
        let title: String = row.get(0)?;
        let description: Option<String> = row.get(1)?;
        let reps: u32 = row.get(2)?;
        let sets: u32 = row.get(3)?;

        Ok(Exercise {
            title: Title::new(&title)
                .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, err.into()))?,
            description: description.unwrap_or_default(),
            reps: Reps::new(reps).map_err(|err| {
                rusqlite::Error::FromSqlConversionFailure(2, Type::Integer, err.into())
            })?,
            sets: Sets::new(sets).map_err(|err| {
                rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, err.into())
            })?,
        })
    }
}

impl CatalogRepository for Catalog {
    fn read_exercises(&self, muscle: Muscle) -> Result<Vec<Exercise>, ReadError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(SELECT_EXERCISES).map_err(storage_error)?;
        let rows = stmt
            .query_map(params![muscle.name()], Self::row_to_exercise)
            .map_err(storage_error)?;

        let mut exercises = Vec::new();
        for exercise in rows {
            exercises.push(exercise.map_err(storage_error)?);
        }
        Ok(exercises)
    }
}

impl CatalogWriter for Catalog {
    fn create_exercise(&self, exercise: &Exercise, muscles: &[Muscle]) -> Result<(), WriteError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction().map_err(storage_error)?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM workouts WHERE title = ?1",
                params![exercise.title.as_ref()],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_error)?;

        if existing.is_some() {
            return Err(WriteError::Conflict);
        }

        let target_muscle = muscles
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(", ");

        tx.execute(
            "INSERT INTO workouts (title, workout_description, target_muscle, reps, sets)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                exercise.title.as_ref(),
                exercise.description,
                target_muscle,
                *exercise.reps,
                *exercise.sets
            ],
        )
        .map_err(storage_error)?;
        let workout_id = tx.last_insert_rowid();

        for muscle in distinct(muscles) {
            tx.execute(
                "INSERT OR IGNORE INTO muscles (muscle_name) VALUES (?1)",
                params![muscle.name()],
            )
            .map_err(storage_error)?;
            tx.execute(
                "INSERT INTO workout_muscle_map (workout_id, muscle_id)
                 SELECT ?1, id FROM muscles WHERE muscle_name = ?2",
                params![workout_id, muscle.name()],
            )
            .map_err(storage_error)?;
        }

        tx.commit().map_err(storage_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::tests::data;

    fn catalog() -> Catalog {
        let catalog = Catalog::open_in_memory().unwrap();
        for (exercise, muscles) in data::ENTRIES.iter() {
            catalog.create_exercise(exercise, muscles).unwrap();
        }
        catalog
    }

    #[rstest]
    #[case(Muscle::Biceps, vec!["Barbell Curl", "Chin Up"])]
    #[case(Muscle::Back, vec!["Chin Up", "Deadlift"])]
    #[case(Muscle::Core, vec!["Plank"])]
    #[case(Muscle::Calves, vec![])]
    fn test_read_exercises(#[case] muscle: Muscle, #[case] expected: Vec<&str>) {
        assert_eq!(
            catalog()
                .read_exercises(muscle)
                .unwrap()
                .iter()
                .map(|e| e.title.as_ref().as_str())
                .collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn test_read_exercises_returns_full_rows() {
        assert_eq!(
            catalog().read_exercises(Muscle::Core).unwrap(),
            vec![data::PLANK.clone()]
        );
    }

    #[test]
    fn test_create_exercise_conflict() {
        let catalog = catalog();

        assert!(matches!(
            catalog.create_exercise(&data::PLANK, &[Muscle::Core]),
            Err(WriteError::Conflict)
        ));
        assert_eq!(catalog.read_exercises(Muscle::Core).unwrap().len(), 1);
    }

    #[test]
    fn test_read_exercises_rows_written_by_other_tools() {
        let catalog = Catalog::open_in_memory().unwrap();
        let conn = catalog.connection().unwrap();
        conn.execute_batch(
            "INSERT INTO workouts (id, title, workout_description) VALUES (7, 'Wall Sit', NULL);
             INSERT INTO muscles (id, muscle_name) VALUES (3, 'quadriceps');
             INSERT INTO workout_muscle_map (workout_id, muscle_id) VALUES (7, 3);",
        )
        .unwrap();
        drop(conn);

        let exercises = catalog.read_exercises(Muscle::Quadriceps).unwrap();

        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].title.as_ref(), "Wall Sit");
        assert_eq!(exercises[0].description, "");
        assert_eq!((*exercises[0].reps, *exercises[0].sets), (10, 3));
    }

    #[test]
    fn test_create_exercise_repeated_muscle() {
        let catalog = Catalog::open_in_memory().unwrap();

        catalog
            .create_exercise(&data::PLANK, &[Muscle::Core, Muscle::Core])
            .unwrap();

        assert_eq!(
            catalog.read_exercises(Muscle::Core).unwrap(),
            vec![data::PLANK.clone()]
        );
    }

    #[test]
    fn test_read_exercises_repeated_mapping() {
        let catalog = Catalog::open_in_memory().unwrap();
        let conn = catalog.connection().unwrap();
        conn.execute_batch(
            "INSERT INTO workouts (id, title) VALUES (1, 'Plank'), (2, 'Crunch');
             INSERT INTO muscles (id, muscle_name) VALUES (1, 'core');
             INSERT INTO workout_muscle_map (workout_id, muscle_id) VALUES (1, 1), (1, 1), (2, 1);",
        )
        .unwrap();
        drop(conn);

        assert_eq!(
            catalog
                .read_exercises(Muscle::Core)
                .unwrap()
                .iter()
                .map(|e| e.title.as_ref().as_str())
                .collect::<Vec<_>>(),
            vec!["Plank", "Crunch"]
        );
    }

    #[test]
    fn test_read_exercises_invalid_row() {
        let catalog = Catalog::open_in_memory().unwrap();
        let conn = catalog.connection().unwrap();
        conn.execute_batch(
            "INSERT INTO workouts (id, title, reps, sets) VALUES (1, 'Crunch', 0, 3);
             INSERT INTO muscles (id, muscle_name) VALUES (1, 'core');
             INSERT INTO workout_muscle_map (workout_id, muscle_id) VALUES (1, 1);",
        )
        .unwrap();
        drop(conn);

        assert!(matches!(
            catalog.read_exercises(Muscle::Core),
            Err(ReadError::Storage(StorageError::Other(_)))
        ));
    }

    #[test]
    fn test_open_file_persists_exercises() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workout_data.db");

        Catalog::open(&path)
            .unwrap()
            .create_exercise(&data::BARBELL_CURL, &[Muscle::Biceps])
            .unwrap();

        assert_eq!(
            Catalog::open(&path)
                .unwrap()
                .read_exercises(Muscle::Biceps)
                .unwrap(),
            vec![data::BARBELL_CURL.clone()]
        );
    }
}
