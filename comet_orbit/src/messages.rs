//! Console text shown to the user.

use crate::config::DefaultParameters;
use crate::input::{InputError, ParameterKind};
use crate::orbit::DerivedOrbit;
use crate::pipeline::PipelineError;

pub const BANNER: &str = "
Моделирование движения кометы в поле тяготения Солнца

Программа строит траекторию кометы по начальным условиям и сохраняет 2 файла \
с изображением орбиты и 1 файл с анимацией её движения.
Введите данные:";

pub const INVALID_INPUT: &str = "Некорректные данные";

pub const COMPUTING: &str = "Вычисление орбиты...";

pub const SUCCESS: &str =
    "Орбита успешно построена. Результаты сохранены в текущей директории.";

pub const RETRY_HINT: &str =
    "Попробуйте изменить начальные параметры и запустить программу снова.";

pub fn prompt(kind: ParameterKind, defaults: &DefaultParameters) -> String {
    let default = kind.default_input(defaults);
    match kind {
        ParameterKind::Distance => format!(
            "Введите расстояние от кометы до Солнца (в м) или \"def\" для значения по умолчанию ({default:e}): "
        ),
        ParameterKind::Speed => format!(
            "Введите начальную скорость кометы (в м/с) или \"def\" для значения по умолчанию ({default}): "
        ),
        ParameterKind::Angle => format!(
            "Введите угол между векторами скорости и радиуса (в градусах) или \"def\" для значения по умолчанию ({default}): "
        ),
    }
}

pub fn input_rejected(err: &InputError) -> String {
    let detail = match err {
        InputError::InfinityMarker | InputError::NonFinite => {
            "бесконечные значения не допускаются"
        }
        InputError::NotANumber(_) => "ожидается число",
        InputError::OutOfRange { kind, .. } => match kind {
            ParameterKind::Distance => "расстояние должно быть положительным",
            ParameterKind::Speed => "скорость не может быть отрицательной",
            ParameterKind::Angle => "угол должен лежать в пределах от 0 до 180 градусов",
        },
    };
    format!("{INVALID_INPUT}: {detail}")
}

pub fn orbit_summary(orbit: &DerivedOrbit) -> String {
    format!(
        "Момент импульса L = {:.6e} м²/с, эксцентриситет e = {:.6}",
        orbit.angular_momentum, orbit.eccentricity
    )
}

pub fn failure(err: &PipelineError) -> String {
    match err {
        PipelineError::InvalidOrbit(source) => {
            format!("Недопустимые параметры орбиты: {source}")
        }
        PipelineError::Render(source) => format!("Произошла ошибка: {source:#}"),
    }
}
