use crate::models::Program;

/// Exercises of every program, in display order.
pub const WORKOUTS: [(Program, [&str; 6]); 4] = [
    (
        Program::A,
        [
            "Жим лежа",
            "Приседания",
            "Тяга в наклоне",
            "Жим плечами",
            "Сгибание рук",
            "Разгибание трицепса",
        ],
    ),
    (
        Program::B,
        [
            "Жим ногами",
            "Становая тяга",
            "Подтягивания",
            "Отжимания на брусьях",
            "Скручивания",
            "Икроножные",
        ],
    ),
    (
        Program::C,
        ["Наклонный жим", "Выпады", "Тяга верхнего блока", "Разведение рук", "Молотки", "Пресс"],
    ),
    (
        Program::D,
        [
            "Гакк-приседания",
            "Румынская тяга",
            "Гребля",
            "Подъемы в стороны",
            "Бицепс на скамье",
            "Пуловер",
        ],
    ),
];

pub fn programs() -> impl Iterator<Item = Program> {
    WORKOUTS.iter().map(|(program, _)| *program)
}

pub fn exercises(program: Program) -> &'static [&'static str] {
    WORKOUTS
        .iter()
        .find(|(p, _)| *p == program)
        .map(|(_, list)| list.as_slice())
        .unwrap_or(&[])
}

/// Every exercise of every program, programs in cycle order.
pub fn all_exercises() -> impl Iterator<Item = &'static str> {
    WORKOUTS.iter().flat_map(|(_, list)| list.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn programs_follow_cycle_order() {
        let listed: Vec<Program> = programs().collect();
        assert_eq!(listed, Program::ALL.to_vec());
    }

    #[test]
    fn every_program_has_six_exercises() {
        for program in Program::ALL {
            assert_eq!(exercises(program).len(), 6, "{program}");
        }
        assert_eq!(all_exercises().count(), 24);
        assert_eq!(exercises(Program::B)[1], "Становая тяга");
    }
}
