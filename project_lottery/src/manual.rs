/*!

This is the long-form manual for `project_lottery` and `quadlot`.

## The lottery

Each player receives the same budget of votes (`votes_per_person`) and must
spend all of it over the contested projects. A ballot must contain a
whole, non-negative number of votes for every contested project, and nothing
else.

The projects are then resolved one after the other, starting with the project
that received the most votes overall. Projects with the same total are
resolved in the order they are listed in the configuration.

For each project, every player who has not won a project yet receives lottery
tickets:
* `linear`: one ticket per vote
* `quadratic`: the square of the number of votes

A number is drawn uniformly between 1 and the total number of tickets. The
tickets are laid out in the order of the players, so that with the votes
`P1: 3, P2: 0, P3: 2` under linear counting, the intervals are `[0, 3, 3, 5]`:
`P1` wins with the numbers 1 to 3 and `P3` with 4 or 5. `P2` has no ticket and
cannot win. The winner is removed from all the following lotteries. A project
for which the remaining players cast no vote is left unallocated.

The numbers are drawn from a generator seeded with the SHA-256 hash of the
vote file. Running the same file again gives the same outcome.

## Input formats

The following formats are supported by `quadlot`:
* `yaml` (default)
* `json`
* `csv`
* `xlsx`

### `yaml`

```text
Configs:
  votes_per_person: 10
  counting_type: quadratic
  contested_projects: [A, B]
Players:
  P1: {A: 7, B: 3}
  P2: {A: 0, B: 10}
```

`contended_projects` is accepted as an alias of `contested_projects`.

### `json`

The same structure as the YAML input, in JSON notation.

### `csv`

One row per player. The first column is the name of the player, the
following columns are the projects, named in the first row:

```text
player,A,B
P1,7,3
P2,0,10
```

An empty cell is a missing vote. The rules of the lottery must be
provided with the `--config` flag.

### `xlsx`

The same layout as the CSV input, in an Excel worksheet. Use
`--excel-worksheet-name` if the workbook contains more than one worksheet.

## Configuration

The `--config` flag takes a YAML or JSON file with a `Configs` section, as
above. It overrides the `Configs` section of the vote file if there is one.

## Output

`--out` writes a JSON summary of the run (use `stdout` to print it). The
`results` array holds one entry per project, in the order of resolution:

```text
{"round": 1, "project": "A", "tally": {"P1": "7", "P2": "0"},
 "intervals": ["0", "49", "49"], "winningNumber": "12", "winner": "P1"}
```

`--reference` compares the summary with a previously written one and fails if
they differ.

## Exit codes

* `0` the allocation ran
* `1` some ballots violate the rules, nothing was drawn
* `2` the configuration or the input could not be read

 */
