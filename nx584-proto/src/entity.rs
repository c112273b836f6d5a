//! Zone and partition value objects, and the pure function that derives a
//! partition's high-level state from its condition bitmap.

use std::collections::HashMap;

use crate::catalog::{PartitionConditionFlags, ZoneConditionFlags, ZoneTypeFlags};

/// High-level partition state, derived from the condition bitmap by
/// [`derive_partition_state`]. Priority-ordered: the first matching rule
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionState {
    Disarmed,
    ArmedHome,
    ArmedAway,
    Pending,
    Triggered,
    Arming,
    Disarming,
    Unknown,
}

/// Derive a partition's state from its 48-bit condition bitmap. Rules are
/// evaluated in order; the first match wins.
///
/// 1. Siren on (either siren bit) -> Triggered.
/// 2. Armed and exit delay (exit1/exit2) active -> Arming.
/// 3. Armed and entry delay active -> Pending.
/// 4. Armed with entry guard -> ArmedHome.
/// 5. Armed (any other combination) -> ArmedAway.
/// 6. Ready to arm (either ready bit) -> Disarmed.
/// 7. Otherwise -> Pending.
pub fn derive_partition_state(flags: PartitionConditionFlags) -> PartitionState {
    use PartitionConditionFlags as F;

    let armed = flags.contains(F::ARMED);

    if flags.contains(F::SIREN_ON) || flags.contains(F::STEADY_SIREN_ON) {
        return PartitionState::Triggered;
    }

    if armed && (flags.contains(F::EXIT1) || flags.contains(F::EXIT2)) {
        return PartitionState::Arming;
    }

    if armed && flags.contains(F::ENTRY) {
        return PartitionState::Pending;
    }

    if armed && flags.contains(F::ENTRY_GUARD) {
        return PartitionState::ArmedHome;
    }

    if armed {
        return PartitionState::ArmedAway;
    }

    if flags.contains(F::READY_TO_ARM) || flags.contains(F::READY_TO_FORCE_ARM) {
        return PartitionState::Disarmed;
    }

    PartitionState::Pending
}

/// A partition, keyed by its 1-based index (1..=8).
#[derive(Debug, Clone)]
pub struct Partition {
    index: u8,
    condition_flags: PartitionConditionFlags,
    dirty: bool,
}

impl Partition {
    pub fn new(index: u8) -> Partition {
        Partition {
            index,
            condition_flags: PartitionConditionFlags::empty(),
            dirty: true,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn condition_flags(&self) -> PartitionConditionFlags {
        self.condition_flags
    }

    pub fn state(&self) -> PartitionState {
        derive_partition_state(self.condition_flags)
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Update the condition bitmap, marking the partition dirty if it
    /// actually changed.
    pub fn set_condition_flags(&mut self, flags: PartitionConditionFlags) {
        if flags != self.condition_flags {
            self.condition_flags = flags;
            self.dirty = true;
        }
    }
}

/// Convert a 1-based panel partition index (1..=8) to the wire's 0-based
/// index.
pub fn partition_index_to_panel(server_index: u8) -> u8 {
    server_index - 1
}

/// Convert a wire 0-based panel partition index to the 1-based index used
/// throughout the rest of the crate.
pub fn panel_index_to_partition(panel_index: u8) -> u8 {
    panel_index + 1
}

/// A zone, keyed by its 1-based server index.
#[derive(Debug, Clone)]
pub struct Zone {
    server_index: u16,
    panel_index: u16,
    name: String,
    partition_mask: u8,
    type_flags: ZoneTypeFlags,
    condition_flags: ZoneConditionFlags,
    dirty: bool,
}

impl Zone {
    pub fn new(server_index: u16) -> Zone {
        Zone {
            server_index,
            panel_index: server_index - 1,
            name: String::new(),
            partition_mask: 0,
            type_flags: ZoneTypeFlags::empty(),
            condition_flags: ZoneConditionFlags::empty(),
            dirty: true,
        }
    }

    pub fn server_index(&self) -> u16 {
        self.server_index
    }

    pub fn panel_index(&self) -> u16 {
        self.panel_index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: String) {
        if name != self.name {
            self.name = name;
            self.dirty = true;
        }
    }

    pub fn partition_mask(&self) -> u8 {
        self.partition_mask
    }

    pub fn type_flags(&self) -> ZoneTypeFlags {
        self.type_flags
    }

    pub fn condition_flags(&self) -> ZoneConditionFlags {
        self.condition_flags
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Set the partition-membership, type and condition bitmaps in one
    /// shot, as they arrive together in a Zone Status response.
    pub fn set_masks(&mut self, partition_mask: u8, type_flags: ZoneTypeFlags, condition_flags: ZoneConditionFlags) {
        if partition_mask != self.partition_mask || type_flags != self.type_flags || condition_flags != self.condition_flags
        {
            self.partition_mask = partition_mask;
            self.type_flags = type_flags;
            self.condition_flags = condition_flags;
            self.dirty = true;
        }
    }

    pub fn faulted(&self) -> bool {
        self.condition_flags.contains(ZoneConditionFlags::FAULTED)
    }

    pub fn tampered(&self) -> bool {
        self.condition_flags.contains(ZoneConditionFlags::TAMPERED)
    }

    pub fn bypassed(&self) -> bool {
        self.condition_flags.contains(ZoneConditionFlags::BYPASSED)
    }

    pub fn inhibited(&self) -> bool {
        self.condition_flags.contains(ZoneConditionFlags::INHIBITED)
    }

    pub fn low_battery(&self) -> bool {
        self.condition_flags.contains(ZoneConditionFlags::LOW_BATTERY)
    }

    pub fn supervision_lost(&self) -> bool {
        self.condition_flags.contains(ZoneConditionFlags::SUPERVISION_LOST)
    }

    pub fn alarm_memory(&self) -> bool {
        self.condition_flags.contains(ZoneConditionFlags::ALARM_MEMORY)
    }

    pub fn bypass_memory(&self) -> bool {
        self.condition_flags.contains(ZoneConditionFlags::BYPASS_MEMORY)
    }

    pub fn trouble(&self) -> bool {
        self.condition_flags.contains(ZoneConditionFlags::TROUBLE)
            || self.supervision_lost()
            || self.low_battery()
    }

    pub fn is_fire(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::FIRE)
    }

    pub fn is_24_hour(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::HOUR24)
    }

    pub fn is_key_switch(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::KEY_SWITCH)
    }

    pub fn is_follower(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::FOLLOWER)
    }

    pub fn has_entry_exit_delay1(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::ENTRY_EXIT_DELAY1)
    }

    pub fn has_entry_exit_delay2(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::ENTRY_EXIT_DELAY2)
    }

    pub fn is_interior(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::INTERIOR)
    }

    pub fn is_local_only(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::LOCAL_ONLY)
    }

    pub fn has_keypad_sounder(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::KEYPAD_SOUNDER)
    }

    pub fn is_yelping_siren(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::YELPING_SIREN)
    }

    pub fn is_steady_siren(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::STEADY_SIREN)
    }

    pub fn is_chime(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::CHIME)
    }

    pub fn is_bypassable(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::BYPASSABLE)
    }

    pub fn is_group_bypassable(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::GROUP_BYPASSABLE)
    }

    pub fn is_force_armable(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::FORCE_ARMABLE)
    }

    pub fn is_entry_guard(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::ENTRY_GUARD)
    }

    pub fn has_fast_loop_response(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::FAST_LOOP_RESPONSE)
    }

    pub fn has_double_eol_tamper(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::DOUBLE_EOL_TAMPER)
    }

    pub fn reports_trouble(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::TROUBLE)
    }

    pub fn is_cross_zone(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::CROSS_ZONE)
    }

    pub fn has_dialer_delay(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::DIALER_DELAY)
    }

    pub fn has_swinger_shutdown(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::SWINGER_SHUTDOWN)
    }

    pub fn is_restorable(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::RESTORABLE)
    }

    pub fn is_listen_in(&self) -> bool {
        self.type_flags.contains(ZoneTypeFlags::LISTEN_IN)
    }
}

/// Convert a 1-based server zone index to the wire's 0-based panel index.
pub fn zone_index_to_panel(server_index: u16) -> u16 {
    server_index - 1
}

/// Convert a wire 0-based panel zone index to the 1-based server index.
pub fn panel_index_to_zone(panel_index: u16) -> u16 {
    panel_index + 1
}

/// Registry of zones known to the controller, keyed by 1-based server
/// index.
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    zones: HashMap<u16, Zone>,
}

impl ZoneRegistry {
    pub fn new() -> ZoneRegistry {
        ZoneRegistry { zones: HashMap::new() }
    }

    pub fn get_or_create(&mut self, server_index: u16) -> &mut Zone {
        self.zones.entry(server_index).or_insert_with(|| Zone::new(server_index))
    }

    pub fn get(&self, server_index: u16) -> Option<&Zone> {
        self.zones.get(&server_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    pub fn iter_dirty(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values().filter(|z| z.dirty())
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Registry of partitions known to the controller, keyed by 1-based index.
#[derive(Debug, Default)]
pub struct PartitionRegistry {
    partitions: HashMap<u8, Partition>,
}

impl PartitionRegistry {
    pub fn new() -> PartitionRegistry {
        PartitionRegistry {
            partitions: HashMap::new(),
        }
    }

    pub fn get_or_create(&mut self, index: u8) -> &mut Partition {
        self.partitions.entry(index).or_insert_with(|| Partition::new(index))
    }

    pub fn get(&self, index: u8) -> Option<&Partition> {
        self.partitions.get(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.values()
    }

    pub fn iter_dirty(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.values().filter(|p| p.dirty())
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disarmed_when_not_armed() {
        // Not armed and no ready bit set falls through to the Pending
        // catch-all, not Disarmed — see `pending_is_the_fallback_state`.
        let f = PartitionConditionFlags::READY_TO_ARM;
        assert_eq!(derive_partition_state(f), PartitionState::Disarmed);

        let f2 = PartitionConditionFlags::READY_TO_FORCE_ARM;
        assert_eq!(derive_partition_state(f2), PartitionState::Disarmed);
    }

    #[test]
    fn armed_away_is_the_default_armed_state() {
        let f = PartitionConditionFlags::ARMED;
        assert_eq!(derive_partition_state(f), PartitionState::ArmedAway);
    }

    #[test]
    fn armed_home_when_entry_guard_set() {
        let f = PartitionConditionFlags::ARMED | PartitionConditionFlags::ENTRY_GUARD;
        assert_eq!(derive_partition_state(f), PartitionState::ArmedHome);
    }

    #[test]
    fn pending_when_entry_delay_active_while_armed() {
        let f = PartitionConditionFlags::ARMED | PartitionConditionFlags::ENTRY;
        assert_eq!(derive_partition_state(f), PartitionState::Pending);
    }

    #[test]
    fn arming_when_exit_delay_active() {
        let f = PartitionConditionFlags::ARMED | PartitionConditionFlags::EXIT1;
        assert_eq!(derive_partition_state(f), PartitionState::Arming);

        let f2 = PartitionConditionFlags::ARMED | PartitionConditionFlags::EXIT2;
        assert_eq!(derive_partition_state(f2), PartitionState::Arming);
    }

    #[test]
    fn exit_delay_outranks_entry_guard_while_armed() {
        let f = PartitionConditionFlags::ARMED | PartitionConditionFlags::EXIT1 | PartitionConditionFlags::ENTRY_GUARD;
        assert_eq!(derive_partition_state(f), PartitionState::Arming);
    }

    #[test]
    fn pending_is_the_fallback_state() {
        let f = PartitionConditionFlags::CHIME_MODE;
        assert_eq!(derive_partition_state(f), PartitionState::Pending);
    }

    #[test]
    fn triggered_overrides_everything_else() {
        let f = PartitionConditionFlags::ARMED | PartitionConditionFlags::ENTRY | PartitionConditionFlags::SIREN_ON;
        assert_eq!(derive_partition_state(f), PartitionState::Triggered);

        let steady_only = PartitionConditionFlags::STEADY_SIREN_ON;
        assert_eq!(derive_partition_state(steady_only), PartitionState::Triggered);
    }

    #[test]
    fn zone_panel_index_round_trips() {
        for server_index in 1u16..=8 {
            let panel = zone_index_to_panel(server_index);
            assert_eq!(panel_index_to_zone(panel), server_index);
        }
    }

    #[test]
    fn partition_panel_index_round_trips() {
        for server_index in 1u8..=8 {
            let panel = partition_index_to_panel(server_index);
            assert_eq!(panel_index_to_partition(panel), server_index);
        }
    }

    #[test]
    fn zone_set_masks_marks_dirty_only_on_change() {
        let mut zone = Zone::new(1);
        zone.clear_dirty();
        assert!(!zone.dirty());

        zone.set_masks(0b01, ZoneTypeFlags::FIRE, ZoneConditionFlags::FAULTED);
        assert!(zone.dirty());
        zone.clear_dirty();

        zone.set_masks(0b01, ZoneTypeFlags::FIRE, ZoneConditionFlags::FAULTED);
        assert!(!zone.dirty());

        zone.set_masks(0b01, ZoneTypeFlags::FIRE, ZoneConditionFlags::empty());
        assert!(zone.dirty());
        assert!(!zone.faulted());
    }

    #[test]
    fn zone_type_and_condition_predicates_reflect_their_bits() {
        let mut zone = Zone::new(1);
        zone.set_masks(
            0b01,
            ZoneTypeFlags::FIRE | ZoneTypeFlags::ENTRY_EXIT_DELAY1 | ZoneTypeFlags::BYPASSABLE,
            ZoneConditionFlags::TAMPERED | ZoneConditionFlags::LOW_BATTERY,
        );

        assert!(zone.is_fire());
        assert!(zone.has_entry_exit_delay1());
        assert!(zone.is_bypassable());
        assert!(!zone.is_interior());

        assert!(zone.tampered());
        assert!(zone.low_battery());
        assert!(zone.trouble());
        assert!(!zone.faulted());
        assert!(!zone.alarm_memory());
    }

    #[test]
    fn zone_registry_get_or_create_is_idempotent() {
        let mut registry = ZoneRegistry::new();
        registry.get_or_create(3).set_name("Kitchen".to_string());
        assert_eq!(registry.get(3).unwrap().name(), "Kitchen");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn partition_registry_tracks_dirty_partitions() {
        let mut registry = PartitionRegistry::new();
        registry.get_or_create(1).clear_dirty();
        registry
            .get_or_create(2)
            .set_condition_flags(PartitionConditionFlags::ARMED);
        let dirty: Vec<u8> = registry.iter_dirty().map(|p| p.index()).collect();
        assert_eq!(dirty, vec![2]);
    }
}
