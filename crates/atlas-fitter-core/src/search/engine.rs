//! Depth-first branch-and-bound over a guillotine free-rectangle partition.
//!
//! The recursion is linearized onto an application-managed stack of
//! [`SearchFrame`]s. That shape is load-bearing: the call budget is checked
//! between any two placement steps without host-stack cost, peak memory stays
//! proportional to the number of areas, and a frame (plus the candidate
//! state) is a complete checkpoint of one exploration.

use crate::model::Bin;

use super::list::{AreaList, FreeList};
use super::{Globals, Placement, REFILL_SLICE};

/// Sizing constraints that stay fixed for the lifetime of one search.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Limits {
    pub max_width: u32,
    pub max_height: u32,
    /// Already raised to the largest single area's size.
    pub max_bin_size: u64,
}

/// Where a parent frame continues once a child frame pops.
#[derive(Debug, Clone, Copy, Default)]
enum Resume {
    #[default]
    AfterFirstSplit,
    AfterSecondSplit,
}

/// Per-depth state held across the two recursion points of one placement.
#[derive(Debug, Clone, Default)]
struct SearchFrame {
    resume: Resume,
    /// Unfitted-list node of the area this frame is placing.
    area: Option<usize>,
    prev_area: usize,
    /// Free-list node currently under test and its predecessor.
    cur_free: Option<usize>,
    prev_free: usize,
    /// Free regions examined for the current area at this depth.
    tried: u32,
    remain_right: u32,
    remain_bottom: u32,
    /// The current trial opened a fresh bin.
    bin_added: bool,
    /// The current trial grew the owning bin; snapshot restored on backtrack.
    bin_grew: bool,
    saved_bin: Bin,
    saved_out_size: u64,
    /// Minima over the still-unfitted areas; remainders smaller than these
    /// in either dimension can never be used again.
    min_width: u32,
    min_height: u32,
    /// Remainders inserted for the active configuration and where.
    split_count: usize,
    split_prevs: [usize; 2],
    /// Remainder count of the first configuration, kept so an empty second
    /// configuration does not re-run an identical subtree.
    first_split_count: usize,
}

enum Step {
    NextArea,
    ScanFree,
    PostPlace,
    AdvanceFree,
    ReattachArea,
    UnwindFirst,
    UnwindSecond,
    RestoreFree,
    Pop,
}

enum Refill {
    Granted,
    Superseded,
    Exhausted,
}

pub(crate) struct Worker<'a> {
    limits: Limits,
    globals: &'a Globals,
    /// Sorted (width descending) area dimensions, shared across workers.
    areas: &'a [(u32, u32)],
    /// Local slice of the shared call budget.
    calls_left: u64,
    unfitted: AreaList,
    free: FreeList,
    bins: Vec<Bin>,
    bin_count: usize,
    out_size: u64,
    best_out_size: u64,
    best_bin_count: usize,
    placements: Vec<Placement>,
    stack: Vec<SearchFrame>,
    depth: usize,
    /// First scratch slot in the free-rect slab; slots below it belong to
    /// the starting bins.
    scratch_base: usize,
}

impl<'a> Worker<'a> {
    pub(crate) fn new(
        areas: &'a [(u32, u32)],
        seed_bins: &[Bin],
        limits: Limits,
        min_bin_count: usize,
        globals: &'a Globals,
        root_area: usize,
    ) -> Self {
        debug_assert!(areas.len() >= 2);
        let scratch_base = 1 + min_bin_count;
        let mut free = FreeList::with_slots(scratch_base + 3 * areas.len());
        for i in 0..min_bin_count {
            // Seed dimensions are upper-bound hints; zero or missing entries
            // open the full configured extent.
            let w = match seed_bins.get(i) {
                Some(b) if b.width > 0 => b.width,
                _ => limits.max_width,
            };
            let h = match seed_bins.get(i) {
                Some(b) if b.height > 0 => b.height,
                _ => limits.max_height,
            };
            free.set(1 + i, i, 0, 0, w, h);
            free.insert(1 + i);
        }
        let mut unfitted = AreaList::new(areas.len());
        if root_area > 0 {
            unfitted.promote(root_area);
        }
        Self {
            limits,
            globals,
            areas,
            calls_left: 0,
            unfitted,
            free,
            bins: vec![Bin::default(); min_bin_count],
            bin_count: min_bin_count,
            out_size: 0,
            // One below the global sentinel so the first complete placement
            // always beats the local snapshot.
            best_out_size: u64::MAX - 1,
            best_bin_count: usize::MAX,
            placements: vec![Placement::default(); areas.len()],
            stack: vec![SearchFrame::default(); areas.len()],
            depth: 0,
            scratch_base,
        }
    }

    /// Runs the search to completion: budget exhaustion, supersession, or an
    /// exhausted search space. Results are reported through `Globals`.
    pub(crate) fn run(&mut self) {
        self.stack[0] = SearchFrame {
            area: self.unfitted.first(),
            prev_area: AreaList::SENTINEL,
            ..SearchFrame::default()
        };
        self.depth = 0;

        let mut step = Step::NextArea;
        'machine: loop {
            match step {
                Step::NextArea => {
                    let Some(node) = self.stack[self.depth].area else {
                        step = Step::Pop;
                        continue;
                    };
                    if self.out_size >= self.best_out_size
                        || self.bin_count > self.best_bin_count
                    {
                        step = Step::Pop;
                        continue;
                    }
                    if self.calls_left == 0 {
                        match self.refill() {
                            Refill::Granted => {}
                            Refill::Superseded => {
                                step = Step::Pop;
                                continue;
                            }
                            Refill::Exhausted => break 'machine,
                        }
                    }
                    self.calls_left -= 1;
                    let prev_area = self.stack[self.depth].prev_area;
                    self.unfitted.detach(prev_area, node);
                    let first_free = self.free.first();
                    let s = &mut self.stack[self.depth];
                    s.tried = 0;
                    s.prev_free = FreeList::SENTINEL;
                    s.cur_free = first_free;
                    step = Step::ScanFree;
                }

                Step::ScanFree => {
                    let d = self.depth;
                    let Some(anode) = self.stack[d].area else {
                        step = Step::ReattachArea;
                        continue;
                    };
                    let (aw, ah) = self.areas[AreaList::area_index(anode)];
                    let cur = match self.stack[d].cur_free {
                        Some(c) => {
                            self.stack[d].bin_added = false;
                            c
                        }
                        None => {
                            // End of the free list. If nothing accepted this
                            // area anywhere and a new bin would not exceed
                            // the best count, open one sized to the caps
                            // (widened for an oversized area).
                            let s = &self.stack[d];
                            if s.tried > 0 || self.bin_count == self.best_bin_count {
                                step = Step::ReattachArea;
                                continue;
                            }
                            let node = self.scratch_slot(d, 2);
                            let w = aw.max(self.limits.max_width);
                            let h = ah.max(self.limits.max_height);
                            self.free.set(node, self.bin_count, 0, 0, w, h);
                            let prev = self.free.insert(node);
                            if self.bin_count == self.bins.len() {
                                self.bins.push(Bin::default());
                            } else {
                                self.bins[self.bin_count] = Bin::default();
                            }
                            self.bin_count += 1;
                            let s = &mut self.stack[d];
                            s.prev_free = prev;
                            s.bin_added = true;
                            node
                        }
                    };
                    self.stack[d].cur_free = Some(cur);
                    let fr = *self.free.get(cur);
                    if aw > fr.w || ah > fr.h {
                        let next = self.free.next_of(cur);
                        let s = &mut self.stack[d];
                        s.prev_free = cur;
                        s.cur_free = next;
                        step = Step::ScanFree;
                        continue;
                    }
                    self.stack[d].remain_right = fr.w - aw;
                    self.stack[d].remain_bottom = fr.h - ah;
                    if !self.try_grow_bin(d, fr.bin, fr.x + aw, fr.y + ah) {
                        step = Step::AdvanceFree;
                        continue;
                    }
                    self.placements[AreaList::area_index(anode)] = Placement {
                        bin: fr.bin,
                        x: fr.x,
                        y: fr.y,
                    };
                    if self.unfitted.first().is_none() {
                        // Every area is placed; offer this layout as a best.
                        self.offer_best();
                        step = Step::PostPlace;
                        continue;
                    }
                    let (min_w, min_h) = self.unfitted_minima();
                    let s = &mut self.stack[d];
                    s.min_width = min_w;
                    s.min_height = min_h;
                    // Take the host rectangle out while children carve up
                    // its remainders.
                    let prev_free = s.prev_free;
                    self.free.unlink_after(prev_free);
                    self.insert_splits(d, false);
                    self.stack[d].first_split_count = self.stack[d].split_count;
                    self.stack[d].resume = Resume::AfterFirstSplit;
                    self.push_frame();
                    step = Step::NextArea;
                }

                Step::UnwindFirst => {
                    let d = self.depth;
                    self.remove_splits(d);
                    if self.out_size < self.best_out_size
                        && self.bin_count <= self.best_bin_count
                    {
                        self.insert_splits(d, true);
                        if self.stack[d].split_count + self.stack[d].first_split_count > 0 {
                            self.stack[d].resume = Resume::AfterSecondSplit;
                            self.push_frame();
                            step = Step::NextArea;
                            continue;
                        }
                    }
                    step = Step::RestoreFree;
                }

                Step::UnwindSecond => {
                    self.remove_splits(self.depth);
                    step = Step::RestoreFree;
                }

                Step::RestoreFree => {
                    let s = &self.stack[self.depth];
                    if let Some(cur) = s.cur_free {
                        self.free.relink_after(s.prev_free, cur);
                    }
                    step = Step::PostPlace;
                }

                Step::PostPlace => {
                    let d = self.depth;
                    if self.stack[d].bin_grew {
                        if let Some(cur) = self.stack[d].cur_free {
                            let bin = self.free.get(cur).bin;
                            self.bins[bin] = self.stack[d].saved_bin;
                            self.out_size = self.stack[d].saved_out_size;
                        }
                        self.stack[d].bin_grew = false;
                    }
                    step = Step::AdvanceFree;
                }

                Step::AdvanceFree => {
                    let d = self.depth;
                    if self.stack[d].bin_added {
                        // The synthesized bin was the last resort; undo it
                        // and stop scanning for this area at this depth.
                        let prev = self.stack[d].prev_free;
                        self.free.unlink_after(prev);
                        self.bin_count -= 1;
                        step = Step::ReattachArea;
                        continue;
                    }
                    if self.out_size >= self.best_out_size
                        || self.bin_count > self.best_bin_count
                    {
                        step = Step::ReattachArea;
                        continue;
                    }
                    if let Some(cur) = self.stack[d].cur_free {
                        let next = self.free.next_of(cur);
                        let s = &mut self.stack[d];
                        s.prev_free = cur;
                        s.cur_free = next;
                    }
                    step = Step::ScanFree;
                }

                Step::ReattachArea => {
                    let d = self.depth;
                    let (prev, area) = {
                        let s = &self.stack[d];
                        (s.prev_area, s.area)
                    };
                    if let Some(node) = area {
                        self.unfitted.attach(prev, node);
                        let next = self.unfitted.next_of(node);
                        let s = &mut self.stack[d];
                        s.prev_area = node;
                        s.area = next;
                    }
                    step = Step::NextArea;
                }

                Step::Pop => {
                    if self.depth == 0 {
                        break 'machine;
                    }
                    self.depth -= 1;
                    step = match self.stack[self.depth].resume {
                        Resume::AfterFirstSplit => Step::UnwindFirst,
                        Resume::AfterSecondSplit => Step::UnwindSecond,
                    };
                }
            }
        }

        // Hand any unused slice back so other workers can spend it.
        if self.calls_left > 0 {
            let mut g = self.globals.lock();
            g.calls_left += self.calls_left;
            self.calls_left = 0;
        }
    }

    fn push_frame(&mut self) {
        self.depth += 1;
        self.stack[self.depth] = SearchFrame {
            area: self.unfitted.first(),
            prev_area: AreaList::SENTINEL,
            ..SearchFrame::default()
        };
    }

    fn scratch_slot(&self, depth: usize, k: usize) -> usize {
        self.scratch_base + depth * 3 + k
    }

    /// Takes the next budget slice, re-reading the shared best first. Slices
    /// of up to [`REFILL_SLICE`] calls amortize the synchronization cost.
    fn refill(&mut self) -> Refill {
        let mut g = self.globals.lock();
        if self.best_out_size > g.best_out_size || self.best_bin_count > g.best_bin_count {
            self.best_out_size = g.best_out_size;
            self.best_bin_count = g.best_bin_count;
            return Refill::Superseded;
        }
        if g.calls_left == 0 {
            return Refill::Exhausted;
        }
        let take = g.calls_left.min(REFILL_SLICE);
        g.calls_left -= take;
        self.calls_left = take;
        Refill::Granted
    }

    /// Checks whether placing an area that reaches `(reach_w, reach_h)` in
    /// `bin` keeps the candidate under the size cap and the current best,
    /// growing the bin (with a backtrack snapshot) when it does.
    fn try_grow_bin(&mut self, d: usize, bin: usize, reach_w: u32, reach_h: u32) -> bool {
        let cur = self.bins[bin];
        if reach_w > cur.width || reach_h > cur.height {
            let new_w = reach_w.max(cur.width);
            let new_h = reach_h.max(cur.height);
            let new_size = new_w as u64 * new_h as u64;
            if new_size > self.limits.max_bin_size {
                return false;
            }
            let new_out = self.out_size + new_size - cur.size;
            if new_out >= self.best_out_size {
                self.stack[d].tried += 1;
                return false;
            }
            let s = &mut self.stack[d];
            s.saved_bin = cur;
            s.saved_out_size = self.out_size;
            s.bin_grew = true;
            self.bins[bin] = Bin {
                width: new_w,
                height: new_h,
                size: new_size,
            };
            self.out_size = new_out;
        } else {
            self.stack[d].bin_grew = false;
        }
        self.stack[d].tried += 1;
        true
    }

    /// Inserts the remainders of the active split configuration. The first
    /// configuration keeps the right remainder full-height; the second keeps
    /// the bottom remainder full-width. Remainders too small for every
    /// remaining area are dropped outright.
    fn insert_splits(&mut self, d: usize, second: bool) {
        self.stack[d].split_count = 0;
        let Some(cur) = self.stack[d].cur_free else {
            return;
        };
        let Some(anode) = self.stack[d].area else {
            return;
        };
        let (aw, ah) = self.areas[AreaList::area_index(anode)];
        let fr = *self.free.get(cur);
        let (min_w, min_h, rr, rb) = {
            let s = &self.stack[d];
            (s.min_width, s.min_height, s.remain_right, s.remain_bottom)
        };
        let right_h = if second { ah } else { fr.h };
        let bottom_w = if second { fr.w } else { aw };
        let mut count = 0;
        if rr >= min_w && right_h >= min_h {
            let node = self.scratch_slot(d, 0);
            self.free.set(node, fr.bin, fr.x + aw, fr.y, rr, right_h);
            self.stack[d].split_prevs[count] = self.free.insert(node);
            count += 1;
        }
        if bottom_w >= min_w && rb >= min_h {
            let node = self.scratch_slot(d, 1);
            self.free.set(node, fr.bin, fr.x, fr.y + ah, bottom_w, rb);
            self.stack[d].split_prevs[count] = self.free.insert(node);
            count += 1;
        }
        self.stack[d].split_count = count;
    }

    fn remove_splits(&mut self, d: usize) {
        // Newest first, so each recorded predecessor is valid at unlink time.
        for k in (0..self.stack[d].split_count).rev() {
            self.free.unlink_after(self.stack[d].split_prevs[k]);
        }
    }

    fn unfitted_minima(&self) -> (u32, u32) {
        let mut min_w = u32::MAX;
        let mut min_h = u32::MAX;
        let mut node = self.unfitted.first();
        while let Some(n) = node {
            let (w, h) = self.areas[AreaList::area_index(n)];
            min_w = min_w.min(w);
            min_h = min_h.min(h);
            node = self.unfitted.next_of(n);
        }
        (min_w, min_h)
    }

    /// Offers the completed layout to the shared best. Acceptance demands a
    /// strictly smaller total area and no more bins; on rejection the local
    /// snapshots re-sync so pruning tightens immediately.
    fn offer_best(&mut self) {
        let mut g = self.globals.lock();
        if self.out_size < g.best_out_size && self.bin_count <= g.best_bin_count {
            self.best_out_size = self.out_size;
            self.best_bin_count = self.bin_count;
            g.best_out_size = self.out_size;
            g.best_bin_count = self.bin_count;
            g.best_placements.clear();
            g.best_placements.extend_from_slice(&self.placements);
            g.best_bins.clear();
            g.best_bins.extend_from_slice(&self.bins[..self.bin_count]);
        } else {
            self.best_out_size = g.best_out_size;
            self.best_bin_count = g.best_bin_count;
        }
    }
}
