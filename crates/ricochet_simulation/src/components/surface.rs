//! Классификация поверхностей арены

use bevy::prelude::*;

/// Маркер: от этой поверхности снаряды рикошетят (пока есть bounce budget)
///
/// Явная queryable-способность вместо строковых тегов хостового движка:
/// ядру нужен только булев ответ "bounceable или нет" на контакт.
#[derive(Component, Debug, Default, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Bounceable;
