use slotmap::new_key_type;

new_key_type! {
    /// Identifies a placed equipment instance in the registry arena.
    pub struct EquipmentId;
}
