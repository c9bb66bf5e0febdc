use std::io::{self, BufRead, Write};

use repcycle_domain::{Exercise, Muscle, Recommendation, RecommendationService};

pub const DONE: &str = "Done";

/// Answers requests read line by line from `input` until [`DONE`] or the end of input.
pub fn run(
    service: &impl RecommendationService,
    mut input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    writeln!(
        output,
        "Enter what muscles you would like to work on. Type '{DONE}' to finish."
    )?;

    while let Some(request) = read_line(&mut input)? {
        if request == DONE {
            break;
        }

        if !answer(service, &request, &mut input, &mut output)? {
            break;
        }

        writeln!(
            output,
            "Please type what muscles you would like to work on. Type '{DONE}' to finish."
        )?;
    }

    Ok(())
}

/// Returns `false` if the input ended while a muscle had to be chosen.
fn answer(
    service: &impl RecommendationService,
    request: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<bool> {
    let mut result = service.recommend(request);

    loop {
        let offered = match result {
            Ok(Recommendation::NoMuscleFound) => {
                writeln!(
                    output,
                    "No relevant muscles found. Please refine your request."
                )?;
                return Ok(true);
            }
            Ok(Recommendation::Choose(offered)) => {
                writeln!(
                    output,
                    "Which particular muscle would you like to work on: {}?",
                    names(&offered)
                )?;
                offered
            }
            Ok(Recommendation::InvalidChoice(offered)) => {
                writeln!(output, "Enter a muscle among the list above.")?;
                offered
            }
            Ok(Recommendation::Exercises(exercises)) => {
                write_exercises(output, &exercises)?;
                return Ok(true);
            }
            Ok(Recommendation::NoExercisesFound) => {
                writeln!(
                    output,
                    "No exercises were found. Please refine your request."
                )?;
                return Ok(true);
            }
            Err(err) => {
                writeln!(output, "Failed to get exercises: {err}")?;
                return Ok(true);
            }
        };

        let Some(choice) = read_line(input)? else {
            return Ok(false);
        };
        result = service.choose(&offered, &choice);
    }
}

fn write_exercises(output: &mut impl Write, exercises: &[Exercise]) -> io::Result<()> {
    writeln!(output, "Recommended Exercises:")?;
    for (i, exercise) in exercises.iter().enumerate() {
        writeln!(output, "{}. {}", i + 1, exercise.title)?;
        writeln!(output, "Description: {}", exercise.description)?;
        writeln!(output, "Reps: {} Sets: {}\n", exercise.reps, exercise.sets)?;
    }
    Ok(())
}

fn names(muscles: &[Muscle]) -> String {
    muscles
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
