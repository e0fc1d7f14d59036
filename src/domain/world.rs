use crate::domain::coordinate::{
    AttackBoardId, AttackInstance, LevelId, MainBoard, PinId, Rotation, SquareId, Track,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Horizontal spacing between square centers in world units, and the
/// vertical spacing per level-index step.
const SQUARE_SPACING: f32 = 2.0;
const LEVEL_SPACING: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquareColor {
    Dark,
    Light,
}

/// Square color is a pure function of the column, which is what gives the
/// variant its vertical color alignment: the same file-rank is the same
/// color on every level.
pub fn square_color(file: u8, rank: u8) -> SquareColor {
    if (file + rank) % 2 == 0 {
        SquareColor::Dark
    } else {
        SquareColor::Light
    }
}

#[derive(Clone, Debug)]
pub struct Square {
    pub id: SquareId,
    pub color: SquareColor,
    /// Precomputed render-space position: x across files, y along ranks,
    /// z up through the levels.
    pub world: [f32; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardKind {
    Main,
    Attack,
}

#[derive(Clone, Debug)]
pub struct BoardLayout {
    pub id: LevelId,
    pub kind: BoardKind,
    pub file_offset: u8,
    pub rank_offset: u8,
    pub width: u8,
    pub depth: u8,
    pub rotation: Rotation,
    pub level_index: i8,
    pub z_height: f32,
}

impl BoardLayout {
    pub fn contains(&self, file: u8, rank: u8) -> bool {
        file >= self.file_offset
            && file < self.file_offset + self.width
            && rank >= self.rank_offset
            && rank < self.rank_offset + self.depth
    }
}

/// A fixed dock position. The twelve pins are static world data; which of
/// them carry a board at any moment lives in `BoardStates`.
#[derive(Clone, Debug)]
pub struct Pin {
    pub id: PinId,
    pub host: MainBoard,
    pub file_offset: u8,
    pub rank_offset: u8,
    /// End pins mount the board below their host platform instead of above.
    pub inverted: bool,
    pub level_index: i8,
    pub z_height: f32,
    pub adjacent: SmallVec<[PinId; 3]>,
}

impl Pin {
    pub fn footprint(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (0..2u8).flat_map(move |df| {
            (0..2u8).map(move |dr| (self.file_offset + df, self.rank_offset + dr))
        })
    }
}

// (host, rank_offset, inverted) for pins 1..=6, in rank order. Pins 3 and 4
// share a rank span at different heights: the front corner of the bottom
// platform sits under the rear corner of the top one.
const PIN_TABLE: [(MainBoard, u8, bool); 6] = [
    (MainBoard::White, 0, true),
    (MainBoard::Neutral, 2, false),
    (MainBoard::White, 4, false),
    (MainBoard::Black, 4, false),
    (MainBoard::Neutral, 6, false),
    (MainBoard::Black, 8, true),
];

/// The immutable world: every square on every main board and every one of
/// the 24 attack-board instances, plus the pins. Built once per game and
/// read-only afterwards.
#[derive(Clone, Debug)]
pub struct World {
    squares: FxHashMap<SquareId, Square>,
    layouts: FxHashMap<LevelId, BoardLayout>,
    pins: Vec<Pin>,
    /// Every level (active or not) owning a square at a given column.
    columns: FxHashMap<(u8, u8), SmallVec<[LevelId; 8]>>,
}

impl World {
    pub fn new() -> Self {
        let mut world = World {
            squares: FxHashMap::default(),
            layouts: FxHashMap::default(),
            pins: Vec::with_capacity(12),
            columns: FxHashMap::default(),
        };
        world.build_pins();
        world.build_main_boards();
        world.build_attack_instances();
        world
    }

    fn build_pins(&mut self) {
        for track in Track::ALL {
            for number in 1..=6u8 {
                let (host, rank_offset, inverted) = PIN_TABLE[(number - 1) as usize];
                let level_index = host.level_index() + if inverted { -1 } else { 1 };

                let mut adjacent = SmallVec::new();
                if number > 1 {
                    adjacent.push(PinId::new(track, number - 1));
                }
                if number < 6 {
                    adjacent.push(PinId::new(track, number + 1));
                }
                adjacent.push(PinId::new(track.opposite(), number));

                self.pins.push(Pin {
                    id: PinId::new(track, number),
                    host,
                    file_offset: track.file_offset(),
                    rank_offset,
                    inverted,
                    level_index,
                    z_height: level_index as f32 * LEVEL_SPACING,
                    adjacent,
                });
            }
        }
    }

    fn build_main_boards(&mut self) {
        for board in MainBoard::ALL {
            let (lo, _) = board.rank_span();
            let id = LevelId::Main(board);
            let layout = BoardLayout {
                id,
                kind: BoardKind::Main,
                file_offset: 1,
                rank_offset: lo,
                width: 4,
                depth: 4,
                rotation: Rotation::R0,
                level_index: board.level_index(),
                z_height: board.level_index() as f32 * LEVEL_SPACING,
            };
            self.add_board_squares(&layout);
            self.layouts.insert(id, layout);
        }
    }

    fn build_attack_instances(&mut self) {
        for pin_idx in 0..self.pins.len() {
            let pin = self.pins[pin_idx].clone();
            for rotation in [Rotation::R0, Rotation::R180] {
                let id = LevelId::Instance(AttackInstance {
                    pin: pin.id,
                    rotation,
                });
                let layout = BoardLayout {
                    id,
                    kind: BoardKind::Attack,
                    file_offset: pin.file_offset,
                    rank_offset: pin.rank_offset,
                    width: 2,
                    depth: 2,
                    rotation,
                    level_index: pin.level_index,
                    z_height: pin.z_height,
                };
                self.add_board_squares(&layout);
                self.layouts.insert(id, layout);
            }
        }
    }

    fn add_board_squares(&mut self, layout: &BoardLayout) {
        for file in layout.file_offset..layout.file_offset + layout.width {
            for rank in layout.rank_offset..layout.rank_offset + layout.depth {
                let id = SquareId::new(file, rank, layout.id);
                let square = Square {
                    id,
                    color: square_color(file, rank),
                    world: [
                        file as f32 * SQUARE_SPACING,
                        rank as f32 * SQUARE_SPACING,
                        layout.z_height,
                    ],
                };
                self.squares.insert(id, square);
                self.columns.entry((file, rank)).or_default().push(layout.id);
            }
        }
    }

    pub fn contains(&self, id: &SquareId) -> bool {
        self.squares.contains_key(id)
    }

    /// Panics when the id is not part of the world: a missing square here
    /// means the caller fabricated inconsistent state, not a rule failure.
    pub fn square(&self, id: &SquareId) -> &Square {
        match self.squares.get(id) {
            Some(sq) => sq,
            None => panic!("square {} does not exist in the world", id),
        }
    }

    pub fn try_square(&self, id: &SquareId) -> Option<&Square> {
        self.squares.get(id)
    }

    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.values()
    }

    pub fn square_count(&self) -> usize {
        self.squares.len()
    }

    pub fn pin(&self, id: PinId) -> &Pin {
        let track_base = match id.track {
            Track::Queen => 0,
            Track::King => 6,
        };
        match self.pins.get(track_base + (id.number - 1) as usize) {
            Some(pin) => pin,
            None => panic!("pin {} does not exist in the world", id),
        }
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn layout(&self, id: &LevelId) -> &BoardLayout {
        match self.layouts.get(id) {
            Some(layout) => layout,
            None => panic!("board {} does not exist in the world", id),
        }
    }

    pub fn layouts(&self) -> impl Iterator<Item = &BoardLayout> {
        self.layouts.values()
    }

    /// Every level owning a square at the column, active or not.
    pub fn column_levels(&self, file: u8, rank: u8) -> &[LevelId] {
        self.columns
            .get(&(file, rank))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn level_index(&self, level: &LevelId) -> i8 {
        match level {
            LevelId::Main(b) => b.level_index(),
            LevelId::Instance(inst) => self.pin(inst.pin).level_index,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardPosition {
    pub pin: PinId,
    pub rotation: Rotation,
}

/// Authoritative placement of the four mobile boards. The set of active
/// attack-board instances is a stateless projection of this value; nothing
/// in the `World` is flipped when a board moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardStates {
    positions: [BoardPosition; 4],
}

impl BoardStates {
    /// Standard game start: each board on its home track's end pin.
    pub fn initial() -> Self {
        let mut positions = [BoardPosition {
            pin: PinId::new(Track::Queen, 1),
            rotation: Rotation::R0,
        }; 4];
        for board in AttackBoardId::ALL {
            positions[board.index()] = BoardPosition {
                pin: PinId::new(board.home_track(), board.owner().home_pin_number()),
                rotation: Rotation::R0,
            };
        }
        BoardStates { positions }
    }

    pub fn position(&self, board: AttackBoardId) -> BoardPosition {
        self.positions[board.index()]
    }

    pub fn instance(&self, board: AttackBoardId) -> AttackInstance {
        let pos = self.position(board);
        AttackInstance {
            pin: pos.pin,
            rotation: pos.rotation,
        }
    }

    pub fn with_position(&self, board: AttackBoardId, position: BoardPosition) -> Self {
        let mut next = *self;
        next.positions[board.index()] = position;
        next
    }

    /// The four live instances, one per base board.
    pub fn active_instances(&self) -> [(AttackBoardId, AttackInstance); 4] {
        [
            (AttackBoardId::WhiteQueen, self.instance(AttackBoardId::WhiteQueen)),
            (AttackBoardId::WhiteKing, self.instance(AttackBoardId::WhiteKing)),
            (AttackBoardId::BlackQueen, self.instance(AttackBoardId::BlackQueen)),
            (AttackBoardId::BlackKing, self.instance(AttackBoardId::BlackKing)),
        ]
    }

    pub fn is_active(&self, instance: &AttackInstance) -> bool {
        self.active_instances().iter().any(|(_, i)| i == instance)
    }

    /// The board docked at a pin, regardless of rotation.
    pub fn board_at(&self, pin: PinId) -> Option<AttackBoardId> {
        AttackBoardId::ALL
            .into_iter()
            .find(|b| self.position(*b).pin == pin)
    }

    pub fn track_state(&self, track: Track) -> TrackState {
        let mut boards = SmallVec::new();
        for board in AttackBoardId::ALL {
            let pos = self.position(board);
            if pos.pin.track == track {
                boards.push((board, pos));
            }
        }
        TrackState { track, boards }
    }
}

/// Derived per-track view of the board placements.
#[derive(Clone, Debug)]
pub struct TrackState {
    pub track: Track,
    pub boards: SmallVec<[(AttackBoardId, BoardPosition); 4]>,
}
